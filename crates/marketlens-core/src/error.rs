// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Marketlens workspace.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MarketlensError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required credential or setting is absent.
    #[error("{key} not configured")]
    ConfigurationMissing { key: String },

    /// LLM provider errors (transport failure, non-success status, empty body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested model is not served by the provider.
    #[error("model {requested} not available")]
    ModelUnavailable {
        requested: String,
        available: Vec<String>,
    },

    /// Embedding or nearest-neighbour lookup failures.
    #[error("retrieval error: {message}")]
    Retrieval {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem errors while reading the corpus or model files.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MarketlensError {
    /// Builds a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a retrieval error without an underlying source.
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
            source: None,
        }
    }
}

impl From<std::io::Error> for MarketlensError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage {
            source: Box::new(e),
        }
    }
}
