// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express, such as
//! the chunk overlap staying below the chunk size.

use crate::diagnostic::ConfigError;
use crate::model::MarketlensConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns every collected error rather than stopping at the first one.
pub fn validate_config(config: &MarketlensConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.llm.provider != "gemini" {
        fail(format!(
            "llm.provider `{}` is not supported (expected `gemini`)",
            config.llm.provider
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }

    let docs = &config.documents;
    if docs.chunk_size == 0 {
        fail("documents.chunk_size must be greater than 0".to_string());
    } else if docs.chunk_overlap >= docs.chunk_size {
        fail(format!(
            "documents.chunk_overlap ({}) must be smaller than documents.chunk_size ({})",
            docs.chunk_overlap, docs.chunk_size
        ));
    }

    if docs.top_k == 0 {
        fail("documents.top_k must be at least 1".to_string());
    }

    if config.guardrails.max_input_chars == 0 {
        fail("guardrails.max_input_chars must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
