// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use marketlens_chains::ExtractionError;
use marketlens_core::MarketlensError;
use marketlens_guardrails::GuardrailError;
use thiserror::Error;

/// Errors surfaced by [`Analyst`](crate::Analyst) operations.
#[derive(Debug, Error)]
pub enum AnalystError {
    /// Input rejected before any model call.
    #[error(transparent)]
    Guardrail(#[from] GuardrailError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Request shape is unusable (no input, missing schema).
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Core(#[from] MarketlensError),
}
