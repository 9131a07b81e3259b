// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marketlens - a market analyst service over a local document corpus.
//!
//! This is the binary entry point. `serve` (the default) runs the HTTP API;
//! the other subcommands exercise the same wiring from the command line.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;

use clap::{Parser, Subcommand};

/// Marketlens - question answering, summarization, and extraction over Gemini.
#[derive(Parser, Debug)]
#[command(name = "marketlens", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Index the document corpus and report the chunk count.
    Ingest,
    /// Answer a single question from the corpus.
    Ask {
        /// The question to answer.
        question: String,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match marketlens_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            marketlens_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Ingest => commands::run_ingest(&config).await,
        Commands::Ask { question } => commands::run_ask(&config, &question).await,
        Commands::Config => commands::run_config(&config),
    };

    if let Err(e) = result {
        eprintln!("marketlens: {e}");
        std::process::exit(1);
    }
}
