// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for the Marketlens analyst.
//!
//! Exposes question answering, summarization, extraction, and auto-routing
//! as JSON endpoints under `/api/v1`. Errors are `{"detail": ...}` bodies:
//! rejected input maps to 400, injection attempts to 403, and chain or
//! provider failures to 500.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use server::{GatewayState, ServerConfig, router, start_server};
