// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Driver bootstrap
//!
//! Wires configuration into the process-wide services: the event pool, the
//! retrieval service, the home catalog and the Prometheus recorder.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::PathBuf;
use tracing::info;

use digi_core::application::{PoolHandle, PoolRegistry};
use digi_core::domain::config::DigiConfigManifest;
use digi_core::infrastructure::telemetry::describe_pool_metrics;
use digi_intent::application::RetrievalService;
use digi_intent::infrastructure::{create_encoder, HomeCatalog};

use crate::server::AppState;

/// Discover, override and validate the driver configuration.
pub fn load_config(path: Option<PathBuf>) -> Result<DigiConfigManifest> {
    let config =
        DigiConfigManifest::load_or_default(path).context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    info!("Configuration loaded for {}", config.spec.resource);
    Ok(config)
}

/// Create the pool for the configured resource.
///
/// An unknown provider key terminates the process.
pub fn build_pool(config: &DigiConfigManifest) -> PoolHandle {
    let registry = PoolRegistry::new(config.spec.pool.clone());
    let handle = PoolHandle::new(registry.create_or_exit(&config.spec.resource));

    match handle.stream() {
        Some(stream) => info!("Event pool '{}' ready", stream),
        None => info!("Event pools disabled"),
    }

    handle
}

pub fn build_retrieval(config: &DigiConfigManifest) -> Result<RetrievalService> {
    let encoder = create_encoder(&config.spec.intent.encoder)
        .context("Failed to initialize encoder")?;
    Ok(RetrievalService::new(encoder).with_top_k(config.spec.intent.top_k))
}

pub fn build_catalog(config: &DigiConfigManifest) -> HomeCatalog {
    HomeCatalog::new(&config.spec.intent.catalog_dir, config.spec.intent.catalog_size)
}

/// Install the global Prometheus recorder, if metrics are enabled.
pub fn install_metrics(config: &DigiConfigManifest) -> Result<Option<PrometheusHandle>> {
    if !config.spec.observability.metrics.enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    describe_pool_metrics();

    Ok(Some(handle))
}

/// Everything `digi serve` needs, built in startup order.
pub fn build_state(config: &DigiConfigManifest) -> Result<AppState> {
    let metrics = install_metrics(config)?;
    let pool = build_pool(config);
    let retrieval = build_retrieval(config)?;
    let catalog = build_catalog(config);

    Ok(AppState {
        pool,
        retrieval,
        catalog,
        default_branch: config.spec.pool.branch.clone(),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use digi_core::domain::config::EncoderConfig;

    fn config(provider: &str) -> DigiConfigManifest {
        let mut config = DigiConfigManifest::default();
        config.spec.resource.name = "l1".to_string();
        config.spec.resource.resource = "lamps".to_string();
        config.spec.pool.provider = provider.to_string();
        config
    }

    #[test]
    fn test_build_pool_disabled() {
        let handle = build_pool(&config("none"));
        assert!(!handle.is_enabled());
    }

    #[test]
    fn test_build_pool_memory() {
        let handle = build_pool(&config("memory"));
        assert_eq!(handle.stream(), Some("l1"));
    }

    #[test]
    fn test_build_retrieval_uses_configured_k() {
        let mut config = config("none");
        config.spec.intent.top_k = 2;
        assert_eq!(build_retrieval(&config).unwrap().top_k(), 2);
    }

    #[test]
    fn test_build_retrieval_unknown_backend() {
        let mut config = config("none");
        config.spec.intent.encoder = EncoderConfig {
            backend: "word2vec".to_string(),
            ..EncoderConfig::default()
        };
        assert!(build_retrieval(&config).is_err());
    }
}
