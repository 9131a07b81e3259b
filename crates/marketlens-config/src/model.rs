// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Values shipped in sample `.env` files that must not be treated as real keys.
const PLACEHOLDER_KEYS: &[&str] = &["your_actual_gemini_key_here", "your_gemini_api_key_here"];

/// Top-level Marketlens configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional and defaults sensibly.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketlensConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// LLM provider selection.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Gemini REST API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Local embedding model settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Document corpus and retrieval settings.
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Input guardrail settings.
    #[serde(default)]
    pub guardrails: GuardrailsConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Service name reported by the root and health endpoints.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "marketlens".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// LLM provider selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Provider name. Only `gemini` is supported.
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

/// Gemini REST API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default completion model.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Model requested by the auto router's classification call.
    #[serde(default = "default_router_model")]
    pub router_model: String,

    /// REST base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Transport timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            router_model: default_router_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("router_model", &self.router_model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Resolves the usable API key from the config value and the
    /// `GEMINI_API_KEY` environment variable, in that order.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(
            self.api_key.as_deref(),
            std::env::var("GEMINI_API_KEY").ok(),
        )
    }
}

/// Picks the first usable key. Empty and placeholder values count as absent.
pub fn resolve_api_key(configured: Option<&str>, env_value: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .filter(|k| is_usable_key(k))
        .or_else(|| env_value.filter(|k| is_usable_key(k)))
        .map(|k| k.trim().to_string())
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key)
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_router_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Local embedding model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Sentence-embedding model name.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Directory where model files are cached.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("marketlens"))
        .unwrap_or_else(|| std::path::PathBuf::from(".marketlens"))
        .to_string_lossy()
        .into_owned()
}

/// Document corpus and retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Directory holding `.txt` and `.md` documents.
    #[serde(default = "default_documents_dir")]
    pub directory: String,

    /// Indexing chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            directory: default_documents_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
        }
    }
}

fn default_documents_dir() -> String {
    "data/documents".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    4
}

/// Input guardrail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuardrailsConfig {
    /// Global switch. When `false`, every input is accepted unchecked.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum accepted input length in characters.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_input_chars: default_max_input_chars(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_input_chars() -> usize {
    10_000
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MarketlensConfig::default();
        assert_eq!(config.app.name, "marketlens");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.router_model, "gemini-1.5-flash");
        assert_eq!(config.gemini.timeout_secs, 120);
        assert_eq!(config.documents.chunk_size, 1000);
        assert_eq!(config.documents.chunk_overlap, 200);
        assert_eq!(config.documents.top_k, 4);
        assert!(config.guardrails.enabled);
        assert_eq!(config.guardrails.max_input_chars, 10_000);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn configured_key_wins_over_env() {
        let key = resolve_api_key(Some("from-config"), Some("from-env".into()));
        assert_eq!(key.as_deref(), Some("from-config"));
    }

    #[test]
    fn env_key_used_when_config_absent() {
        let key = resolve_api_key(None, Some("from-env".into()));
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[test]
    fn placeholder_and_blank_keys_are_absent() {
        assert_eq!(resolve_api_key(Some("your_actual_gemini_key_here"), None), None);
        assert_eq!(resolve_api_key(Some("  "), Some("your_gemini_api_key_here".into())), None);
        assert_eq!(
            resolve_api_key(Some(""), Some("real".into())).as_deref(),
            Some("real")
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GeminiConfig {
            api_key: Some("secret-value".into()),
            ..GeminiConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
