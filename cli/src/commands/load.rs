// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `digi load`: append event records from a file to the pool

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

use digi_core::domain::event::{records_from_value, EventRecord};

use crate::bootstrap;

#[derive(Args)]
pub struct LoadCommand {
    /// JSON array or newline-delimited JSON file, `-` for stdin
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Lake branch (default: spec.pool.branch)
    #[arg(long)]
    branch: Option<String>,
}

pub async fn execute(command: LoadCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = bootstrap::load_config(config_path)?;

    let input = read_input(&command.file)?;
    let records = parse_records(&input)?;
    if records.is_empty() {
        println!("{}", "No records to load".yellow());
        return Ok(());
    }

    let pool = bootstrap::build_pool(&config);
    if !pool.is_enabled() {
        bail!("Event pools are disabled (POOL_PROVIDER={:?})", config.spec.pool.provider);
    }

    let branch = command.branch.unwrap_or_else(|| config.spec.pool.branch.clone());
    let count = records.len();
    pool.load(records, &branch).await;

    // Load failures are swallowed by the pool; surface them here.
    if pool.stats().is_some_and(|stats| stats.failed_loads > 0) {
        bail!("Failed to load {} records, see log for details", count);
    }

    println!(
        "{}",
        format!(
            "✓ Loaded {} records into {} ({})",
            count,
            pool.stream().unwrap_or_default(),
            branch
        )
        .green()
    );

    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }

    std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))
}

/// A single JSON document (object or array of objects), else one object per line.
pub fn parse_records(input: &str) -> Result<Vec<EventRecord>> {
    if let Ok(value) = serde_json::from_str::<Value>(input) {
        return records_from_value(value)
            .context("Expected an event object or an array of event objects");
    }

    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(_) => bail!("line {}: expected an event object", i + 1),
            Err(e) => Err(e).with_context(|| format!("line {}: invalid JSON", i + 1)),
        })
        .collect()
}
