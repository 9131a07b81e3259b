// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic bag-of-words embedder.
//!
//! Each lowercase word is hashed into one of [`MOCK_DIMENSIONS`] buckets and
//! the counts are L2-normalized, so texts sharing words score higher under
//! cosine similarity. Good enough to exercise ranking without an ONNX model.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use marketlens_core::traits::adapter::PluginAdapter;
use marketlens_core::traits::embedding::EmbeddingAdapter;
use marketlens_core::types::{EmbeddingInput, EmbeddingOutput, HealthStatus};
use marketlens_core::MarketlensError;

pub const MOCK_DIMENSIONS: usize = 256;

pub struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` invocations so far (queries included).
    pub fn embed_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Embeds one text without counting the call.
    pub fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; MOCK_DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = fnv1a(&word.to_lowercase()) as usize % MOCK_DIMENSIONS;
            v[bucket] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    async fn health_check(&self) -> Result<HealthStatus, MarketlensError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MarketlensError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| Self::vector(t)).collect(),
            dimensions: MOCK_DIMENSIONS,
        })
    }
}
