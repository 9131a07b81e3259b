// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy `./marketlens.toml` > `~/.config/marketlens/marketlens.toml`
//! > `/etc/marketlens/marketlens.toml` with `MARKETLENS_` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MarketlensConfig;

/// File name looked up in every layer of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "marketlens.toml";

/// Section names that environment keys may target.
const SECTIONS: &[&str] = &[
    "app",
    "llm",
    "gemini",
    "embedding",
    "documents",
    "guardrails",
    "server",
];

/// Paths searched for configuration files, lowest priority first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/marketlens").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("marketlens").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/marketlens/marketlens.toml`
/// 3. `~/.config/marketlens/marketlens.toml`
/// 4. `./marketlens.toml`
/// 5. `MARKETLENS_*` environment variables
pub fn load_config() -> Result<MarketlensConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<MarketlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MarketlensConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MarketlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MarketlensConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(MarketlensConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Keys are mapped with [`map_env_key`] instead of `Env::split("_")` because
/// field names contain underscores: `MARKETLENS_GEMINI_API_KEY` must become
/// `gemini.api_key`, not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MARKETLENS_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env key onto a dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
