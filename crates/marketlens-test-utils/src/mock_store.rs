// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock document store for deterministic testing.
//!
//! `MockDocumentStore` returns a fixed list of chunks (truncated to `k`)
//! and captures every query for assertion in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use marketlens_core::traits::adapter::PluginAdapter;
use marketlens_core::traits::document_store::DocumentStore;
use marketlens_core::types::{HealthStatus, RetrievedChunk};
use marketlens_core::MarketlensError;

/// A query received by the mock store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub text: String,
    pub k: usize,
}

pub struct MockDocumentStore {
    chunks: Vec<RetrievedChunk>,
    failure: Option<String>,
    queries: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl MockDocumentStore {
    /// Store holding `(source, text)` pairs, returned in the given order.
    pub fn with_chunks<'a>(chunks: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let chunks = chunks
            .into_iter()
            .enumerate()
            .map(|(rank, (source, text))| RetrievedChunk {
                text: text.to_string(),
                source: source.to_string(),
                rank,
                score: 1.0 - rank as f32 * 0.1,
            })
            .collect();
        Self {
            chunks,
            failure: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Store whose every query fails with a retrieval error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::with_chunks([])
        }
    }

    /// Get all queries received so far.
    pub async fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockDocumentStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    async fn health_check(&self) -> Result<HealthStatus, MarketlensError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, MarketlensError> {
        self.queries.lock().await.push(RecordedQuery {
            text: text.to_string(),
            k,
        });
        if let Some(message) = &self.failure {
            return Err(MarketlensError::retrieval(message.clone()));
        }
        Ok(self.chunks.iter().take(k).cloned().collect())
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }
}
