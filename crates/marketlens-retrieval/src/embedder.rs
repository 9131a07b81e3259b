// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local sentence embeddings with ONNX Runtime.
//!
//! Runs a sentence-transformers model (all-MiniLM-L6-v2 by default) on CPU,
//! mean-pools token states under the attention mask, and L2-normalizes the
//! result so cosine similarity reduces to a dot product.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use marketlens_core::error::MarketlensError;
use marketlens_core::traits::{EmbeddingAdapter, PluginAdapter};
use marketlens_core::types::{EmbeddingInput, EmbeddingOutput, HealthStatus};

fn embed_err(context: &str, e: impl std::fmt::Display) -> MarketlensError {
    MarketlensError::retrieval(format!("{context}: {e}"))
}

/// ONNX sentence embedder.
pub struct OnnxEmbedder {
    /// Sessions need `&mut` to run, so inference is serialized.
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    dimensions: usize,
}

// Safety: the session is only reached through the Mutex, and the tokenizer is
// only used for encoding, which takes `&self`.
unsafe impl Send for OnnxEmbedder {}
unsafe impl Sync for OnnxEmbedder {}

impl OnnxEmbedder {
    /// Loads the ONNX model and its tokenizer from disk.
    pub fn new(
        model_path: &Path,
        tokenizer_path: &Path,
        dimensions: usize,
    ) -> Result<Self, MarketlensError> {
        let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
            .map_err(|e| embed_err(&format!("loading tokenizer {}", tokenizer_path.display()), e))?;

        let session = Session::builder()
            .map_err(|e| embed_err("creating ONNX session builder", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| embed_err("setting optimization level", e))?
            .with_intra_threads(1)
            .map_err(|e| embed_err("setting thread count", e))?
            .commit_from_file(model_path)
            .map_err(|e| embed_err(&format!("loading ONNX model {}", model_path.display()), e))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimensions,
        })
    }

    /// Embeds one text into a normalized vector.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, MarketlensError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| embed_err("tokenization failed", e))?;

        let widen = |v: &[u32]| v.iter().map(|&x| i64::from(x)).collect::<Vec<i64>>();
        let ids = widen(encoding.get_ids());
        let mask = widen(encoding.get_attention_mask());
        let type_ids = widen(encoding.get_type_ids());
        let seq_len = ids.len();

        let shape = |name: &str, data: Vec<i64>| {
            Array2::from_shape_vec((1, seq_len), data)
                .map_err(|e| embed_err(&format!("building {name} tensor"), e))
        };
        let ids = shape("input_ids", ids)?;
        let mask_arr = shape("attention_mask", mask.clone())?;
        let type_ids = shape("token_type_ids", type_ids)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| embed_err("ONNX session lock poisoned", e))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => tensor_view(&ids)?,
                "attention_mask" => tensor_view(&mask_arr)?,
                "token_type_ids" => tensor_view(&type_ids)?
            ])
            .map_err(|e| embed_err("ONNX inference failed", e))?;

        // Token states, shape [1, seq_len, hidden].
        let (out_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| embed_err("extracting output tensor", e))?;
        let hidden = out_shape
            .last()
            .map(|&d| d as usize)
            .ok_or_else(|| MarketlensError::retrieval("output tensor has no dimensions"))?;

        Ok(l2_normalize(&mean_pool(data, &mask, hidden)))
    }
}

fn tensor_view(arr: &Array2<i64>) -> Result<TensorRef<'_, i64>, MarketlensError> {
    TensorRef::from_array_view(arr).map_err(|e| embed_err("creating tensor view", e))
}

/// Averages token vectors whose attention mask is set.
pub(crate) fn mean_pool(states: &[f32], mask: &[i64], hidden: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden];
    let mut count = 0usize;

    for (token, _) in states.chunks_exact(hidden).zip(mask).filter(|(_, m)| **m > 0) {
        for (acc, v) in sum.iter_mut().zip(token) {
            *acc += v;
        }
        count += 1;
    }

    if count > 0 {
        sum.iter_mut().for_each(|v| *v /= count as f32);
    }
    sum
}

/// Scales a vector to unit length. Zero vectors are returned unchanged.
pub fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl PluginAdapter for OnnxEmbedder {
    fn name(&self) -> &str {
        "onnx-embedder"
    }

    async fn health_check(&self) -> Result<HealthStatus, MarketlensError> {
        Ok(match self.session.lock() {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("session lock poisoned: {e}")),
        })
    }
}

#[async_trait]
impl EmbeddingAdapter for OnnxEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MarketlensError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| self.embed_text(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dimensions,
        })
    }
}
