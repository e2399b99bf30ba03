// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process-wide handle to the driver's pool.
//!
//! Built once at startup and passed to whatever ingests or queries. When pools
//! are disabled the handle is empty and both operations are no-ops.

use serde_json::Value;
use std::sync::Arc;

use super::ingestion_pool::IngestionPool;
use crate::domain::event::EventRecord;
use crate::domain::pool::{PoolError, PoolStatsSnapshot};

#[derive(Clone, Default)]
pub struct PoolHandle {
    pool: Option<Arc<IngestionPool>>,
}

impl PoolHandle {
    pub fn new(pool: Option<Arc<IngestionPool>>) -> Self {
        Self { pool }
    }

    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    pub fn stream(&self) -> Option<&str> {
        self.pool.as_deref().map(IngestionPool::name)
    }

    pub fn stats(&self) -> Option<PoolStatsSnapshot> {
        self.pool.as_ref().map(|pool| pool.stats())
    }

    pub async fn load(&self, records: Vec<EventRecord>, branch: &str) {
        if let Some(pool) = &self.pool {
            pool.load(records, branch).await;
        }
    }

    pub async fn query(&self, expression: &str) -> Result<Vec<Value>, PoolError> {
        match &self.pool {
            Some(pool) => pool.query(expression).await,
            None => Ok(Vec::new()),
        }
    }
}
