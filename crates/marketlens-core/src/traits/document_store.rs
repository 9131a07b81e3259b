// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store trait: nearest-neighbour lookup over an indexed corpus.

use async_trait::async_trait;

use crate::error::MarketlensError;
use crate::traits::adapter::PluginAdapter;
use crate::types::RetrievedChunk;

/// A searchable corpus of embedded text chunks.
#[async_trait]
pub trait DocumentStore: PluginAdapter {
    /// Returns up to `k` chunks closest to `text`, best match first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, MarketlensError>;

    /// Number of chunks currently indexed.
    fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
