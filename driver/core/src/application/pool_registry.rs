// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Pool Provider Registry - Provider Selection and Pool Ownership
//
// Maps a configured provider key to a concrete pool backend and hands out
// at most one pool per resource identity for the life of the process.
// An unknown provider key is fatal at startup.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::ingestion_pool::IngestionPool;
use crate::domain::config::PoolConfig;
use crate::domain::identity::ResourceIdentity;
use crate::domain::pool::{PoolError, PoolProvider};
use crate::infrastructure::lake::create_lake_client;

/// Registry for creating pools and keeping one per stream
pub struct PoolRegistry {
    config: PoolConfig,
    pools: Mutex<HashMap<String, (PoolProvider, Arc<IngestionPool>)>>,
}

impl PoolRegistry {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Create (or return the existing) pool for `identity` using `key`.
    ///
    /// Returns `Ok(None)` when `key` disables pools. A stream has one pool:
    /// the provider that created it first keeps it, and a later request
    /// naming another provider gets that same pool back.
    pub fn create(
        &self,
        key: &str,
        identity: &ResourceIdentity,
    ) -> Result<Option<Arc<IngestionPool>>, PoolError> {
        let provider = match PoolProvider::from_key(key)? {
            Some(provider) => provider,
            None => {
                info!("Pool provider '{}' disables event pools for {}", key, identity);
                return Ok(None);
            }
        };

        let stream = identity.stream_name();
        let mut pools = self.pools.lock();
        if let Some((existing, pool)) = pools.get(&stream) {
            if *existing != provider {
                warn!(
                    "Pool '{}' already uses provider {}, ignoring {}",
                    stream, existing, provider
                );
            }
            return Ok(Some(pool.clone()));
        }

        info!("Creating {} pool '{}' for {}", provider, stream, identity);
        let client = create_lake_client(provider, &self.config);
        let pool = Arc::new(IngestionPool::new(stream.clone(), client));
        pools.insert(stream, (provider, pool.clone()));

        Ok(Some(pool))
    }

    /// Create the pool using the configured provider key.
    pub fn create_configured(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Option<Arc<IngestionPool>>, PoolError> {
        self.create(&self.config.provider, identity)
    }

    /// Startup wrapper around [`create_configured`](Self::create_configured):
    /// an unknown provider terminates the process.
    pub fn create_or_exit(&self, identity: &ResourceIdentity) -> Option<Arc<IngestionPool>> {
        match self.create_configured(identity) {
            Ok(pool) => pool,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    /// Names of all pools created so far
    pub fn streams(&self) -> Vec<String> {
        let mut streams: Vec<String> = self.pools.lock().keys().cloned().collect();
        streams.sort();
        streams
    }
}
