// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `digi query`: run a lake query against the pool and print NDJSON

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::bootstrap;

#[derive(Args)]
pub struct QueryCommand {
    /// Query expression, passed to the lake verbatim
    #[arg(value_name = "EXPR")]
    expression: String,
}

pub async fn execute(command: QueryCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = bootstrap::load_config(config_path)?;

    let pool = bootstrap::build_pool(&config);
    if !pool.is_enabled() {
        bail!("Event pools are disabled (POOL_PROVIDER={:?})", config.spec.pool.provider);
    }

    let records = pool
        .query(&command.expression)
        .await
        .context("Pool query failed")?;

    for record in records {
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}
