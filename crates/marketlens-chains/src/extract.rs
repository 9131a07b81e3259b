// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema-driven structured extraction.

use std::sync::Arc;

use marketlens_core::{ProviderAdapter, ProviderRequest};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::complete_text;
use crate::parse::parse_extraction;
use crate::prompts;
use crate::schema::{ExtractionResult, ExtractionSchema};

/// Task description used when the caller gives none.
pub const DEFAULT_DESCRIPTION: &str = "Extract structured information";

const TEMPERATURE: f32 = 0.1;

/// Why an extraction produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("No text provided for extraction.")]
    EmptyText,

    #[error("No schema provided.")]
    EmptySchema,

    #[error("GEMINI_API_KEY not configured")]
    NotConfigured,

    #[error("No response from Gemini")]
    NoResponse,

    /// The completion parsed as JSON but not as an object.
    #[error("Extracted data is not a valid object.")]
    NotAnObject { raw: String },

    #[error("Could not parse JSON: {detail}")]
    Unparseable { detail: String, raw: String },

    /// The provider call failed; carries the sentinel text.
    #[error("{0}")]
    Upstream(String),
}

impl ExtractionError {
    /// Model output attached for diagnosis, if any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::NotAnObject { raw } | Self::Unparseable { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Extracts schema fields from free text with a single low-temperature completion.
pub struct ExtractionChain {
    provider: Arc<dyn ProviderAdapter>,
}

impl ExtractionChain {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    /// Returns an object holding every schema key, `null` where the model had nothing.
    pub async fn extract(
        &self,
        text: &str,
        schema: &ExtractionSchema,
        description: Option<&str>,
    ) -> Result<ExtractionResult, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyText);
        }
        if schema.is_empty() {
            return Err(ExtractionError::EmptySchema);
        }
        if !self.provider.has_credentials() {
            return Err(ExtractionError::NotConfigured);
        }

        let description = description.unwrap_or(DEFAULT_DESCRIPTION);
        let prompt = prompts::extraction(text, schema, description);
        let request = ProviderRequest::new(prompt).with_temperature(TEMPERATURE);

        let completion = complete_text(self.provider.as_ref(), request)
            .await
            .map_err(ExtractionError::Upstream)?;
        if completion.trim().is_empty() {
            return Err(ExtractionError::NoResponse);
        }

        match parse_extraction(&completion, schema) {
            Ok(result) => {
                debug!(fields = result.len(), "extraction parsed");
                Ok(result)
            }
            Err(e) => {
                let preview: String = completion.chars().take(500).collect();
                warn!(error = %e, "could not parse extraction output: {preview}");
                Err(e)
            }
        }
    }
}
