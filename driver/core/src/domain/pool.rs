// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Pool
//!
//! Provider keys, pool errors and delivery counters shared by the ingestion
//! path.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Closed set of pool providers selected by configuration string

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::lake::LakeError;

/// Provider used when the configured key is empty.
pub const DEFAULT_PROVIDER: &str = "zed";

/// Keys that switch ingestion off without being an error.
pub const DISABLED_PROVIDER_KEYS: &[&str] = &["none", "false"];

/// Concrete pool backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolProvider {
    /// Zed lake over HTTP
    Zed,
    /// In-process lake, for development and tests
    Memory,
}

impl PoolProvider {
    /// Parse a configured provider key.
    ///
    /// `Ok(None)` means pools are disabled. Unknown non-empty keys are a
    /// configuration error.
    pub fn from_key(key: &str) -> Result<Option<Self>, PoolError> {
        let key = if key.is_empty() { DEFAULT_PROVIDER } else { key };

        if DISABLED_PROVIDER_KEYS.contains(&key) {
            return Ok(None);
        }

        match key {
            "zed" => Ok(Some(Self::Zed)),
            "memory" => Ok(Some(Self::Memory)),
            other => Err(PoolError::UnknownProvider(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zed => "zed",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for PoolProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("unknown pool provider {0}")]
    UnknownProvider(String),

    #[error(transparent)]
    Lake(#[from] LakeError),
}

/// Delivery counters of one pool.
///
/// Write failures are swallowed by the pool; these counters are how callers
/// observe them.
#[derive(Debug, Default)]
pub struct PoolStats {
    loaded_batches: AtomicU64,
    loaded_records: AtomicU64,
    failed_loads: AtomicU64,
    dropped_records: AtomicU64,
}

impl PoolStats {
    pub(crate) fn record_success(&self, records: usize) {
        self.loaded_batches.fetch_add(1, Ordering::Relaxed);
        self.loaded_records.fetch_add(records as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, records: usize) {
        self.failed_loads.fetch_add(1, Ordering::Relaxed);
        self.dropped_records.fetch_add(records as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            loaded_batches: self.loaded_batches.load(Ordering::Relaxed),
            loaded_records: self.loaded_records.load(Ordering::Relaxed),
            failed_loads: self.failed_loads.load(Ordering::Relaxed),
            dropped_records: self.dropped_records.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStatsSnapshot {
    pub loaded_batches: u64,
    pub loaded_records: u64,
    pub failed_loads: u64,
    pub dropped_records: u64,
}
