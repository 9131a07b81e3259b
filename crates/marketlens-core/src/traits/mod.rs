// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod document_store;
pub mod embedding;
pub mod provider;

pub use adapter::PluginAdapter;
pub use document_store::DocumentStore;
pub use embedding::EmbeddingAdapter;
pub use provider::ProviderAdapter;
