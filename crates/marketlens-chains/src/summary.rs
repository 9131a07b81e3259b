// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Map-reduce summarization.
//!
//! Short inputs are summarized in one call. Longer inputs are split into
//! overlapping chunks, each chunk is summarized in order, and a final call
//! combines the partial summaries. No single call carries more than
//! [`CHUNK_SIZE`] characters of source text.

use std::sync::Arc;

use marketlens_core::{ProviderAdapter, ProviderRequest};
use marketlens_retrieval::TextSplitter;
use tracing::debug;

use crate::llm::ask;
use crate::prompts;

pub const EMPTY_INPUT: &str = "No text provided for summarization.";
pub const NOT_CONFIGURED: &str = "Error: GEMINI_API_KEY not configured";
pub const NOT_CHUNKABLE: &str = "Error: Could not chunk text for summarization";

/// Default summary length in words.
pub const DEFAULT_MAX_WORDS: usize = 500;

/// Inputs shorter than this are summarized in a single call.
pub const CHUNK_SIZE: usize = 3000;
pub const CHUNK_OVERLAP: usize = 200;

const TEMPERATURE: f32 = 0.3;

pub struct SummaryChain {
    provider: Arc<dyn ProviderAdapter>,
    splitter: TextSplitter,
}

impl SummaryChain {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            provider,
            splitter: TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP),
        }
    }

    /// Summarizes `text` in roughly `max_words` words.
    ///
    /// Empty input and missing credentials return fixed messages instead of errors.
    pub async fn summarize(&self, text: &str, max_words: usize) -> String {
        if text.trim().is_empty() {
            return EMPTY_INPUT.to_string();
        }
        if !self.provider.has_credentials() {
            return NOT_CONFIGURED.to_string();
        }

        if text.chars().count() < CHUNK_SIZE {
            return self.complete(prompts::summary(text, max_words)).await;
        }

        let chunks = self.splitter.split(text);
        if chunks.is_empty() {
            return NOT_CHUNKABLE.to_string();
        }
        debug!(chunks = chunks.len(), "summarizing in chunks");

        let mut partials = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let prompt = prompts::chunk_summary(chunk, i + 1, chunks.len());
            partials.push(self.complete(prompt).await);
        }

        let combined = partials.join("\n\n");
        self.complete(prompts::combine_summaries(&combined, max_words))
            .await
    }

    async fn complete(&self, prompt: String) -> String {
        let request = ProviderRequest::new(prompt).with_temperature(TEMPERATURE);
        ask(self.provider.as_ref(), request).await
    }
}
