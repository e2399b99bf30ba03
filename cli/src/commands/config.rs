// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use digi_core::domain::config::DigiConfigManifest;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate a configuration file with every default filled in
    Generate {
        /// Output path (default: ./digi-config.yaml)
        #[arg(short, long, default_value = "./digi-config.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output } => generate(output),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = DigiConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. DIGI_CONFIG_PATH: {}",
            std::env::var("DIGI_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./digi-config.yaml");
        println!("  4. ~/.digi/config.yaml");
        println!("  5. /etc/digi/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Resource:".bold());
    println!("  {}", config.spec.resource);
    println!("  Stream: {}", config.spec.resource.stream_name());
    println!();

    let pool = &config.spec.pool;
    println!("{}", "Event Pool:".bold());
    if pool.provider.is_empty() {
        println!("  Provider: {}", "(default)".dimmed());
    } else {
        println!("  Provider: {}", pool.provider);
    }
    println!("  Lake: {}", pool.lake_url);
    println!("  Branch: {}", pool.branch);
    println!();

    let intent = &config.spec.intent;
    println!("{}", "Intent Retrieval:".bold());
    println!("  Catalog: {} ({} homes)", intent.catalog_dir, intent.catalog_size);
    println!("  Top k: {}", intent.top_k);
    println!(
        "  Encoder: {} ({})",
        intent.encoder.backend, intent.encoder.model
    );
    println!();

    let network = &config.spec.network;
    println!("{}", "Network:".bold());
    println!("  Listen: {}:{}", network.bind_address, network.port);
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = DigiConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf) -> Result<()> {
    let sample = DigiConfigManifest::default().to_yaml_string()?;

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
