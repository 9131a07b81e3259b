// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Marketlens integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock LLM provider with queued responses and request capture
//! - [`MockEmbedder`] - Bag-of-words embedder with deterministic vectors
//! - [`MockDocumentStore`] - Fixed-result document store with query capture
//! - [`TestHarness`] - An [`Analyst`](marketlens_agent::Analyst) wired over the mocks

pub mod harness;
pub mod mock_embedder;
pub mod mock_provider;
pub mod mock_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
pub use mock_store::{MockDocumentStore, RecordedQuery};
