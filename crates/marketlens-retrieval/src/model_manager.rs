// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding model files: location, first-run download, and loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use marketlens_core::error::MarketlensError;
use tokio::sync::OnceCell;
use tracing::info;

use crate::embedder::OnnxEmbedder;

/// Model that can be downloaded automatically.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Output width of all-MiniLM-L6-v2.
pub const DEFAULT_DIMENSIONS: usize = 384;

const MODEL_URL: &str =
    "https://huggingface.co/onnx-community/all-MiniLM-L6-v2-ONNX/resolve/main/onnx/model_quantized.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// Resolves, downloads, and loads the embedding model.
///
/// Other models are supported when their `model.onnx` and `tokenizer.json`
/// are placed in [`ModelManager::model_dir`] beforehand.
pub struct ModelManager {
    data_dir: PathBuf,
    model: String,
    /// Loaded embedder, shared by every caller.
    embedder: OnceCell<Arc<OnnxEmbedder>>,
}

impl ModelManager {
    pub fn new(data_dir: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            model: model.into(),
            embedder: OnceCell::new(),
        }
    }

    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join("models").join(&self.model)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join("model.onnx")
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir().join("tokenizer.json")
    }

    pub fn is_model_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    /// Returns the embedder, downloading and loading it on first use.
    ///
    /// Concurrent callers share one initialization; a failure is not cached.
    pub async fn embedder(&self) -> Result<Arc<OnnxEmbedder>, MarketlensError> {
        self.embedder
            .get_or_try_init(|| async {
                self.ensure_model().await?;
                let model_path = self.model_path();
                let tokenizer_path = self.tokenizer_path();
                let embedder = tokio::task::spawn_blocking(move || {
                    OnnxEmbedder::new(&model_path, &tokenizer_path, DEFAULT_DIMENSIONS)
                })
                .await
                .map_err(|e| MarketlensError::Internal(format!("embedder load task failed: {e}")))??;
                info!(model = %self.model, "embedding model loaded");
                Ok::<_, MarketlensError>(Arc::new(embedder))
            })
            .await
            .cloned()
    }

    /// Makes sure model files exist, downloading the default model if needed.
    pub async fn ensure_model(&self) -> Result<PathBuf, MarketlensError> {
        if self.is_model_available() {
            return Ok(self.model_path());
        }

        if self.model != DEFAULT_MODEL {
            return Err(MarketlensError::retrieval(format!(
                "embedding model `{}` not found in {} and cannot be downloaded automatically",
                self.model,
                self.model_dir().display()
            )));
        }

        info!("embedding model not found, downloading from HuggingFace");
        let model_dir = self.model_dir();
        tokio::fs::create_dir_all(&model_dir).await?;

        for (filename, url) in [("model.onnx", MODEL_URL), ("tokenizer.json", TOKENIZER_URL)] {
            let dest = model_dir.join(filename);
            if dest.exists() {
                continue;
            }
            match download_file(url, &dest).await {
                Ok(size) => info!(file = filename, size, "downloaded"),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&dest).await;
                    return Err(e);
                }
            }
        }

        info!(dir = %model_dir.display(), "embedding model ready");
        Ok(self.model_path())
    }
}

async fn download_file(url: &str, dest: &Path) -> Result<usize, MarketlensError> {
    let response = reqwest::get(url).await.map_err(|e| MarketlensError::Retrieval {
        message: format!("failed to download {url}: {e}"),
        source: Some(Box::new(e)),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MarketlensError::retrieval(format!(
            "download failed with status {status}: {url}"
        )));
    }

    let bytes = response.bytes().await.map_err(|e| MarketlensError::Retrieval {
        message: format!("failed to read body from {url}: {e}"),
        source: Some(Box::new(e)),
    })?;
    tokio::fs::write(dest, &bytes).await?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_nest_under_model_name() {
        let mgr = ModelManager::new("/tmp/marketlens", DEFAULT_MODEL);
        assert_eq!(
            mgr.model_path(),
            PathBuf::from("/tmp/marketlens/models/all-MiniLM-L6-v2/model.onnx")
        );
        assert_eq!(
            mgr.tokenizer_path(),
            PathBuf::from("/tmp/marketlens/models/all-MiniLM-L6-v2/tokenizer.json")
        );
    }

    #[test]
    fn not_available_when_missing() {
        assert!(!ModelManager::new("/nonexistent", DEFAULT_MODEL).is_model_available());
    }

    #[tokio::test]
    async fn unknown_model_is_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = ModelManager::new(dir.path(), "bge-small-en");
        let err = mgr.ensure_model().await.unwrap_err();
        assert!(err.to_string().contains("bge-small-en"));
        assert!(!mgr.model_dir().exists());
    }
}
