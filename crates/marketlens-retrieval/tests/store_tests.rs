// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store tests over a deterministic mock embedder.

use std::sync::Arc;

use marketlens_config::model::DocumentsConfig;
use marketlens_core::{DocumentStore, HealthStatus, PluginAdapter};
use marketlens_retrieval::{Document, InMemoryStore, TextSplitter, build_store};
use marketlens_test_utils::MockEmbedder;
use proptest::prelude::*;

fn doc(name: &str, text: &str) -> Document {
    Document {
        name: name.to_string(),
        text: text.to_string(),
    }
}

#[tokio::test]
async fn query_ranks_by_similarity() {
    let embedder = Arc::new(MockEmbedder::new());
    let store = InMemoryStore::new(embedder.clone());
    let docs = [
        doc("market.txt", "The market share of Innovate Inc is 12 percent."),
        doc("weather.txt", "Sunny skies are expected over the coast."),
        doc("growth.txt", "Innovate Inc market share grew last quarter."),
    ];
    let added = store
        .index_documents(&docs, &TextSplitter::new(1000, 200))
        .await
        .unwrap();
    assert_eq!(added, 3);
    assert_eq!(store.len(), 3);
    assert_eq!(embedder.embed_calls(), 1, "corpus must be embedded in one call");

    let hits = store.query("Innovate Inc market share", 2).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].rank, 0);
    assert_eq!(hits[1].rank, 1);
    assert!(hits[0].score >= hits[1].score);
    assert!(hits.iter().all(|h| h.source != "weather.txt"));
}

#[tokio::test]
async fn k_larger_than_index_returns_everything() {
    let store = InMemoryStore::new(Arc::new(MockEmbedder::new()));
    store
        .index_documents(&[doc("a.txt", "alpha beta")], &TextSplitter::new(100, 10))
        .await
        .unwrap();
    assert_eq!(store.query("alpha", 4).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_store_returns_no_hits() {
    let store = InMemoryStore::new(Arc::new(MockEmbedder::new()));
    assert!(store.is_empty());
    assert!(store.query("anything", 4).await.unwrap().is_empty());
}

#[tokio::test]
async fn health_tracks_index_and_shutdown_releases_it() {
    let store = InMemoryStore::new(Arc::new(MockEmbedder::new()));
    assert_eq!(
        store.health_check().await.unwrap(),
        HealthStatus::Degraded("no documents indexed".into())
    );

    store
        .index_documents(&[doc("a.txt", "alpha beta")], &TextSplitter::new(100, 10))
        .await
        .unwrap();
    assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);

    store.shutdown().await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn long_documents_are_chunked_with_sources() {
    let store = InMemoryStore::new(Arc::new(MockEmbedder::new()));
    let text = "Revenue grew steadily across every region. ".repeat(40);
    let added = store
        .index_documents(&[doc("report.md", &text)], &TextSplitter::new(200, 40))
        .await
        .unwrap();
    assert!(added > 1);

    let hits = store.query("revenue", added).await.unwrap();
    assert!(hits.iter().all(|h| h.source == "report.md"));
    assert!(hits.iter().all(|h| h.text.chars().count() <= 200));
}

#[tokio::test]
async fn build_store_reads_corpus_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.md"), "Competitors include Apex and Vertex.").unwrap();
    std::fs::write(dir.path().join("ignore.csv"), "a,b,c").unwrap();

    let config = DocumentsConfig {
        directory: dir.path().display().to_string(),
        ..DocumentsConfig::default()
    };
    let store = build_store(Arc::new(MockEmbedder::new()), &config)
        .await
        .unwrap();
    assert_eq!(store.len(), 1);

    let hits = store.query("competitors", 4).await.unwrap();
    assert_eq!(hits[0].source, "notes.md");
}

proptest! {
    #[test]
    fn splitter_respects_chunk_size(
        text in "[a-z \n]{0,2000}",
        size in 20usize..400,
        overlap_pct in 0usize..50,
    ) {
        let overlap = size * overlap_pct / 100;
        let splitter = TextSplitter::new(size, overlap);
        for chunk in splitter.split(&text) {
            prop_assert!(chunk.chars().count() <= size);
            prop_assert!(!chunk.is_empty());
            prop_assert_eq!(chunk.trim(), chunk.as_str());
        }
    }
}
