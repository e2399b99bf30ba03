// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `digi search`: intent retrieval over the home catalog

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use crate::bootstrap;

#[derive(Args)]
pub struct SearchCommand {
    /// Free-text intent
    #[arg(value_name = "TEXT")]
    text: String,

    /// Number of homes to return (default: spec.intent.top_k)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,
}

pub async fn execute(command: SearchCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = bootstrap::load_config(config_path)?;

    let retrieval = bootstrap::build_retrieval(&config)?;
    let homes = bootstrap::build_catalog(&config)
        .load()
        .await
        .context("Failed to load home catalog")?;

    let k = command.top_k.unwrap_or(retrieval.top_k());
    let matched: Vec<Value> = retrieval
        .retrieve(&command.text, &homes, k)
        .await?
        .into_iter()
        .map(|home| home.as_value().clone())
        .collect();

    println!("{}", serde_json::to_string_pretty(&matched)?);

    Ok(())
}
