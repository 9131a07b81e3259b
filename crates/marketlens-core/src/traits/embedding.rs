// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::MarketlensError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for generating vector embeddings from text.
///
/// Embedding adapters power the document store by converting chunks and
/// queries into comparable vector representations.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates embeddings for the given input, one vector per text.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MarketlensError>;

    /// Embeds a single search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, MarketlensError> {
        let output = self
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MarketlensError::retrieval("embedding returned no results"))
    }
}
