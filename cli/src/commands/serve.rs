// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `digi serve`: run the driver HTTP server

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::{bootstrap, server};

#[derive(Args)]
pub struct ServeCommand {
    /// Listen address (default: spec.network.bind_address)
    #[arg(long, env = "DIGI_HOST")]
    host: Option<String>,

    /// Listen port (default: spec.network.port)
    #[arg(long, env = "DIGI_PORT")]
    port: Option<u16>,
}

pub async fn execute(command: ServeCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = bootstrap::load_config(config_path)?;
    let state = bootstrap::build_state(&config)?;

    let network = &config.spec.network;
    let addr = format!(
        "{}:{}",
        command.host.as_deref().unwrap_or(&network.bind_address),
        command.port.unwrap_or(network.port)
    );

    server::run(state, &addr, &config.spec.observability.metrics.path).await
}
