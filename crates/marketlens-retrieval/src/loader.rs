// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text corpus loader.

use std::path::Path;

use marketlens_core::MarketlensError;
use tracing::{debug, info, warn};

/// File extensions read as UTF-8 text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A document read from the corpus directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, used as the chunk source.
    pub name: String,
    pub text: String,
}

/// Reads every `.txt` and `.md` file directly under `dir`, sorted by name.
///
/// A missing directory is an empty corpus. Empty files are skipped.
pub async fn load_documents(dir: &Path) -> Result<Vec<Document>, MarketlensError> {
    if !tokio::fs::try_exists(dir).await? {
        warn!(dir = %dir.display(), "documents directory not found; corpus is empty");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TEXT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if supported {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipping unsupported file");
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = tokio::fs::read_to_string(&path).await?;
        if text.trim().is_empty() {
            debug!(path = %path.display(), "skipping empty document");
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        documents.push(Document { name, text });
    }

    info!(count = documents.len(), dir = %dir.display(), "loaded documents");
    Ok(documents)
}
