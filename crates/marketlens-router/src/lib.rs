// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task routing for the Marketlens service.
//!
//! This crate provides:
//! - [`classify`]: Deterministic mapping from a raw model reply to a [`RouteDecision`]
//! - [`AutoRouter`]: Asks the LLM which task fits a query, then classifies the reply
//!
//! The router never fails. Unrecognized or empty replies, including provider
//! error text, fall back to question answering.
//!
//! [`RouteDecision`]: marketlens_core::RouteDecision

pub mod classifier;
pub mod router;

pub use classifier::classify;
pub use router::{AutoRouter, DEFAULT_ROUTER_MODEL};
