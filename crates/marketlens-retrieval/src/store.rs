// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vector index over embedded corpus chunks.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use marketlens_core::error::MarketlensError;
use marketlens_core::traits::{DocumentStore, EmbeddingAdapter, PluginAdapter};
use marketlens_core::types::{EmbeddingInput, HealthStatus, RetrievedChunk};
use tracing::{debug, info};

use crate::loader::Document;
use crate::splitter::TextSplitter;

/// Dot product of two vectors; equals cosine similarity for normalized input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[derive(Debug, Clone)]
struct IndexedChunk {
    text: String,
    source: String,
    embedding: Vec<f32>,
}

/// Linear-scan nearest-neighbour index.
pub struct InMemoryStore {
    embedder: Arc<dyn EmbeddingAdapter>,
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl InMemoryStore {
    /// Creates an empty store that embeds with `embedder`.
    pub fn new(embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self {
            embedder,
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Splits, embeds, and appends `documents`. Returns the number of chunks added.
    pub async fn index_documents(
        &self,
        documents: &[Document],
        splitter: &TextSplitter,
    ) -> Result<usize, MarketlensError> {
        let mut texts = Vec::new();
        let mut sources = Vec::new();
        for doc in documents {
            for chunk in splitter.split(&doc.text) {
                texts.push(chunk);
                sources.push(doc.name.clone());
            }
        }

        if texts.is_empty() {
            info!("no chunks to index");
            return Ok(0);
        }

        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: texts.clone(),
            })
            .await?;
        if output.embeddings.len() != texts.len() {
            return Err(MarketlensError::retrieval(format!(
                "embedder returned {} vectors for {} chunks",
                output.embeddings.len(),
                texts.len()
            )));
        }

        let added = texts.len();
        let indexed = texts
            .into_iter()
            .zip(sources)
            .zip(output.embeddings)
            .map(|((text, source), embedding)| IndexedChunk {
                text,
                source,
                embedding,
            });
        self.write()?.extend(indexed);

        info!(chunks = added, documents = documents.len(), "indexed corpus");
        Ok(added)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<IndexedChunk>>, MarketlensError> {
        self.chunks
            .write()
            .map_err(|e| MarketlensError::Internal(format!("index lock poisoned: {e}")))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<IndexedChunk>>, MarketlensError> {
        self.chunks
            .read()
            .map_err(|e| MarketlensError::Internal(format!("index lock poisoned: {e}")))
    }
}

#[async_trait]
impl PluginAdapter for InMemoryStore {
    fn name(&self) -> &str {
        "in-memory-store"
    }

    async fn health_check(&self) -> Result<HealthStatus, MarketlensError> {
        if self.is_empty() {
            return Ok(HealthStatus::Degraded("no documents indexed".to_string()));
        }
        self.embedder.health_check().await
    }

    async fn shutdown(&self) -> Result<(), MarketlensError> {
        let dropped = std::mem::take(&mut *self.write()?).len();
        debug!(chunks = dropped, "index released");
        self.embedder.shutdown().await
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, MarketlensError> {
        let query = self.embedder.embed_query(text).await?;

        let chunks = self.read()?;
        let mut scored: Vec<(f32, &IndexedChunk)> = chunks
            .iter()
            .map(|c| (cosine_similarity(&query, &c.embedding), c))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<RetrievedChunk> = scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(rank, (score, chunk))| RetrievedChunk {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                rank,
                score,
            })
            .collect();

        debug!(k, hits = results.len(), "document store query");
        Ok(results)
    }

    fn len(&self) -> usize {
        self.read().map(|c| c.len()).unwrap_or(0)
    }
}
