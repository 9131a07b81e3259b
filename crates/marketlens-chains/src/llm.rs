// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text bridge over a [`ProviderAdapter`].
//!
//! Chains treat every completion as text. Provider failures are folded into
//! fixed sentinel strings so a failed call still yields a well-formed answer.

use std::time::Instant;

use marketlens_core::{MarketlensError, ProviderAdapter, ProviderRequest};
use tracing::{debug, warn};

/// Returned when the model produced no text.
pub const NO_RESPONSE: &str = "No response generated from Gemini";

/// Suggested model when the provider lists nothing.
const LAST_RESORT_MODEL: &str = "gemini-pro";

/// Runs a completion and returns its text, or the sentinel describing why it failed.
///
/// `Ok` may carry an empty string; callers decide what an empty completion means.
pub async fn complete_text(
    provider: &dyn ProviderAdapter,
    request: ProviderRequest,
) -> Result<String, String> {
    let temperature = request.temperature;
    let started = Instant::now();

    match provider.complete(request).await {
        Ok(response) => {
            debug!(
                model = %response.model,
                temperature,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "completion received"
            );
            Ok(response.text)
        }
        Err(e) => {
            warn!(error = %e, "completion failed");
            Err(failure_sentinel(&e))
        }
    }
}

/// Like [`complete_text`] but never fails: errors and empty completions
/// become sentinel strings.
pub async fn ask(provider: &dyn ProviderAdapter, request: ProviderRequest) -> String {
    match complete_text(provider, request).await {
        Ok(text) if text.is_empty() => NO_RESPONSE.to_string(),
        Ok(text) => text,
        Err(sentinel) => sentinel,
    }
}

/// Maps a provider error to the text shown to callers.
pub fn failure_sentinel(error: &MarketlensError) -> String {
    match error {
        MarketlensError::ModelUnavailable { available, .. } => {
            let suggestions = if available.is_empty() {
                LAST_RESORT_MODEL.to_string()
            } else {
                available
                    .iter()
                    .take(3)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "Error: Model not available. Please update the configured model to one of: {suggestions}"
            )
        }
        MarketlensError::Provider { message, .. } => {
            format!("Error calling Gemini API: {message}")
        }
        other => format!("Error calling Gemini API: {other}"),
    }
}
