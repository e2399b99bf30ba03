// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # digi driver
//!
//! The `digi` binary runs a digi's event pool and intent retrieval.
//!
//! ## Commands
//!
//! - `digi serve` - HTTP server: `/query`, `/events`, `/pool/query`, `/health`, `/metrics`
//! - `digi load <FILE>` - Append event records to the pool
//! - `digi query <EXPR>` - Run a lake query against the pool
//! - `digi search <TEXT>` - Rank the home catalog against an intent
//! - `digi config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use digi::commands::{
    self, load::LoadCommand, query::QueryCommand, search::SearchCommand, serve::ServeCommand,
    ConfigCommand,
};
use digi_core::domain::config::DigiConfigManifest;

/// digi driver - event pools and intent retrieval
#[derive(Parser)]
#[command(name = "digi")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "DIGI_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "DIGI_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, global = true, env = "DIGI_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the driver HTTP server
    #[command(name = "serve")]
    Serve(ServeCommand),

    /// Append event records to the pool
    #[command(name = "load")]
    Load(LoadCommand),

    /// Run a lake query against the pool
    #[command(name = "query")]
    Query(QueryCommand),

    /// Rank the home catalog against an intent
    #[command(name = "search")]
    Search(SearchCommand),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Flags win over the configured logging section
    let configured = DigiConfigManifest::load_or_default(cli.config.clone())
        .map(|config| config.spec.observability.logging)
        .unwrap_or_default();
    let level = cli.log_level.as_deref().unwrap_or(&configured.level);
    let format = cli.log_format.as_deref().unwrap_or(&configured.format);
    init_logging(level, format)?;

    match cli.command {
        Commands::Serve(command) => commands::serve::execute(command, cli.config).await,
        Commands::Load(command) => commands::load::execute(command, cli.config).await,
        Commands::Query(command) => commands::query::execute(command, cli.config).await,
        Commands::Search(command) => commands::search::execute(command, cli.config).await,
        Commands::Config { command } => {
            commands::config::handle_command(command, cli.config).await
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        _ => builder.compact().init(),
    }

    Ok(())
}
