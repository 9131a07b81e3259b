// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Marketlens service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// The reason attached to a degraded or unhealthy status.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Healthy => None,
            Self::Degraded(reason) | Self::Unhealthy(reason) => Some(reason),
        }
    }
}

/// The task an incoming request is dispatched to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RouteDecision {
    /// Question answering over the document corpus.
    Qa,
    /// Summarization of caller-supplied text.
    Summary,
    /// Schema-driven structured extraction.
    Extract,
}

// --- Provider types ---

/// A single-prompt completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Requested model; `None` lets the provider pick its configured default.
    pub model: Option<String>,
    pub prompt: String,
    /// Sampling temperature; `None` uses the provider default.
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// Creates a request for `prompt` with provider defaults.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            temperature: None,
        }
    }

    /// Sets the requested model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A completed provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Completion text, already trimmed.
    pub text: String,
    /// The concrete model that served the request.
    pub model: String,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

// --- Retrieval types ---

/// A chunk returned by a document store query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    /// File name of the document the chunk came from.
    pub source: String,
    /// Zero-based position in the result list.
    pub rank: usize,
    /// Cosine similarity to the query.
    pub score: f32,
}
