// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval-augmented question answering.

use std::sync::Arc;

use marketlens_core::{DocumentStore, ProviderAdapter, ProviderRequest, RetrievedChunk};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::ask;
use crate::prompts;

pub const NOT_CONFIGURED: &str =
    "Error: GEMINI_API_KEY not configured. Please set it in the configuration";
pub const STORE_UNAVAILABLE: &str =
    "Error: Vector store not available. Please ensure documents are loaded.";

/// Default retrieval depth.
pub const DEFAULT_TOP_K: usize = 4;

const TEMPERATURE: f32 = 0.7;
const MAX_SOURCES: usize = 3;
const EXCERPT_CHARS: usize = 200;

/// A truncated retrieved chunk returned alongside an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub page_content: String,
    pub source: String,
}

impl SourceExcerpt {
    fn from_chunk(chunk: &RetrievedChunk) -> Self {
        let mut page_content: String = chunk.text.chars().take(EXCERPT_CHARS).collect();
        page_content.push_str("...");
        Self {
            page_content,
            source: chunk.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    #[serde(rename = "source_documents")]
    pub sources: Vec<SourceExcerpt>,
}

impl QaAnswer {
    fn degraded(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }
}

pub struct QaChain {
    provider: Arc<dyn ProviderAdapter>,
    store: Option<Arc<dyn DocumentStore>>,
    top_k: usize,
}

impl QaChain {
    /// `store` is `None` when the corpus could not be indexed at startup.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        store: Option<Arc<dyn DocumentStore>>,
        top_k: usize,
    ) -> Self {
        Self {
            provider,
            store,
            top_k,
        }
    }

    /// Answers `question` from the top matching chunks.
    ///
    /// Never fails: missing credentials, a missing store, and retrieval
    /// errors all come back as an answer text with no sources.
    pub async fn answer(&self, question: &str) -> QaAnswer {
        if !self.provider.has_credentials() {
            return QaAnswer::degraded(NOT_CONFIGURED);
        }
        let Some(store) = &self.store else {
            return QaAnswer::degraded(STORE_UNAVAILABLE);
        };

        let chunks = match store.query(question, self.top_k).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                return QaAnswer::degraded(format!("Error processing question: {e}"));
            }
        };
        debug!(chunks = chunks.len(), "retrieved context");

        let context = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let request =
            ProviderRequest::new(prompts::qa(&context, question)).with_temperature(TEMPERATURE);
        let answer = ask(self.provider.as_ref(), request).await;

        QaAnswer {
            answer,
            sources: chunks
                .iter()
                .take(MAX_SOURCES)
                .map(SourceExcerpt::from_chunk)
                .collect(),
        }
    }
}
