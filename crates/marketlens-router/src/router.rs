// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed task selection.

use std::sync::Arc;

use marketlens_chains::ask;
use marketlens_core::{ProviderAdapter, ProviderRequest, RouteDecision};
use tracing::info;

use crate::classifier::classify;

/// Fast model requested for routing; the provider normalizes it.
pub const DEFAULT_ROUTER_MODEL: &str = "gemini-1.5-flash";

const INSTRUCTION: &str = "You are a router that decides which tool best answers a user query.
Tools:
- qa: answer questions using retrieval over documents
- summary: summarize or condense provided text
- extract: extract structured fields or JSON from text based on a schema

Given the user query, respond with only one word: qa, summary, or extract.
No punctuation, no extra words.";

/// Picks the task for a free-text query with one zero-temperature completion.
pub struct AutoRouter {
    provider: Arc<dyn ProviderAdapter>,
    model: String,
}

impl AutoRouter {
    pub fn new(provider: Arc<dyn ProviderAdapter>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// The routing prompt for `input`.
    pub fn prompt(input: &str) -> String {
        format!("{INSTRUCTION}\n\nUser query:\n{input}\n\nAnswer (one word):")
    }

    /// Classifies `input`. Falls back to [`RouteDecision::Qa`] on any failure.
    pub async fn route(&self, input: &str) -> RouteDecision {
        let request = ProviderRequest::new(Self::prompt(input))
            .with_model(self.model.as_str())
            .with_temperature(0.0);
        let reply = ask(self.provider.as_ref(), request).await;
        let route = classify(&reply);
        info!(%route, reply = reply.as_str(), "auto route selected");
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_layout() {
        let prompt = AutoRouter::prompt("Summarize this report");
        assert!(prompt.starts_with("You are a router"));
        assert!(prompt.contains("No punctuation, no extra words.\n\nUser query:\nSummarize this report\n\n"));
        assert!(prompt.ends_with("Answer (one word):"));
    }
}
