// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task chains for the Marketlens service.
//!
//! Each chain builds a task-specific prompt, runs it through a
//! [`ProviderAdapter`](marketlens_core::ProviderAdapter), and shapes the
//! completion into a typed result:
//!
//! - [`QaChain`] answers questions from retrieved corpus chunks
//! - [`SummaryChain`] summarizes arbitrarily long text
//! - [`ExtractionChain`] fills a caller-supplied schema from free text

pub mod extract;
pub mod llm;
pub mod parse;
pub mod prompts;
pub mod qa;
pub mod schema;
pub mod summary;

pub use extract::{ExtractionChain, ExtractionError};
pub use llm::ask;
pub use qa::{QaAnswer, QaChain, SourceExcerpt};
pub use schema::{ExtractionResult, ExtractionSchema, FieldValue};
pub use summary::SummaryChain;
