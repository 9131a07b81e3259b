// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands: `ingest`, `ask`, and `config`.

use marketlens_config::model::MarketlensConfig;
use marketlens_core::{DocumentStore, MarketlensError};

use crate::serve::{build_analyst, build_document_store, init_tracing};

const REDACTED: &str = "[REDACTED]";

/// Indexes the corpus and prints how many chunks it produced.
pub async fn run_ingest(config: &MarketlensConfig) -> Result<(), MarketlensError> {
    init_tracing(&config.app.log_level);
    let store = build_document_store(config).await?;
    println!(
        "indexed {} chunks from {}",
        store.len(),
        config.documents.directory
    );
    Ok(())
}

/// Answers one question and prints the answer followed by its sources.
pub async fn run_ask(config: &MarketlensConfig, question: &str) -> Result<(), MarketlensError> {
    init_tracing(&config.app.log_level);
    let analyst = build_analyst(config).await?;
    let answer = analyst
        .answer(question)
        .await
        .map_err(|e| MarketlensError::Internal(e.to_string()))?;

    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!();
        for source in &answer.sources {
            println!("- {}", source.source);
        }
    }
    analyst.shutdown().await;
    Ok(())
}

/// Prints the effective configuration as TOML.
pub fn run_config(config: &MarketlensConfig) -> Result<(), MarketlensError> {
    print!("{}", render_config(config)?);
    Ok(())
}

fn render_config(config: &MarketlensConfig) -> Result<String, MarketlensError> {
    let mut shown = config.clone();
    if shown.gemini.api_key.is_some() {
        shown.gemini.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| MarketlensError::Internal(format!("failed to render config: {e}")))
}
