// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store for the Marketlens RAG service.
//!
//! Loads a plain-text corpus, splits it with [`TextSplitter`], embeds chunks
//! with a local ONNX model, and answers nearest-neighbour queries through
//! [`InMemoryStore`].

pub mod embedder;
pub mod loader;
pub mod model_manager;
pub mod splitter;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use marketlens_config::model::DocumentsConfig;
use marketlens_core::{EmbeddingAdapter, MarketlensError};

pub use embedder::OnnxEmbedder;
pub use loader::{Document, load_documents};
pub use model_manager::ModelManager;
pub use splitter::TextSplitter;
pub use store::InMemoryStore;

/// Builds a store over the configured corpus directory.
pub async fn build_store(
    embedder: Arc<dyn EmbeddingAdapter>,
    config: &DocumentsConfig,
) -> Result<InMemoryStore, MarketlensError> {
    let documents = load_documents(Path::new(&config.directory)).await?;
    let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap);
    let store = InMemoryStore::new(embedder);
    store.index_documents(&documents, &splitter).await?;
    Ok(store)
}
