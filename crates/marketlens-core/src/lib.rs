// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Marketlens RAG service.
//!
//! This crate provides the trait definitions, error type, and common types
//! used throughout the workspace. The Gemini client, the embedder, and the
//! document store all implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MarketlensError;
pub use types::{
    EmbeddingInput, EmbeddingOutput, HealthStatus, ProviderRequest,
    ProviderResponse, RetrievedChunk, RouteDecision,
};

pub use traits::{DocumentStore, EmbeddingAdapter, PluginAdapter, ProviderAdapter};
