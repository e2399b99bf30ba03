// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # IngestionPool: per-resource event stream
//!
//! Owns one named stream on the lake. Writers are serialized through the
//! pool's lock; readers go straight to the lake.
//!
//! ## Delivery
//!
//! Loads are at-most-once and fire-and-forget: a failed lake write is logged,
//! counted in [`PoolStats`] and the `digi_pool_load_failures_total` metric,
//! and dropped. Nothing is retried and the caller never sees the error.
//!
//! ## Locking
//!
//! The lock only serializes writers of the same pool. Pools of different
//! resources never contend, and queries never take the lock.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::event::{encode_batch, ingestion_timestamp, stamp_batch, EventRecord};
use crate::domain::lake::{LakeClient, DEFAULT_BRANCH};
use crate::domain::pool::{PoolError, PoolStats, PoolStatsSnapshot};
use crate::infrastructure::telemetry;

pub struct IngestionPool {
    name: String,
    lock: Mutex<()>,
    client: Arc<dyn LakeClient>,
    stats: PoolStats,
}

impl std::fmt::Debug for IngestionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPool")
            .field("name", &self.name)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl IngestionPool {
    pub fn new(name: impl Into<String>, client: Arc<dyn LakeClient>) -> Self {
        Self {
            name: name.into(),
            lock: Mutex::new(()),
            client,
            stats: PoolStats::default(),
        }
    }

    /// Stream name this pool writes to
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &'static str {
        self.client.backend()
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    /// Load a batch into the default branch.
    pub async fn load_default(&self, records: Vec<EventRecord>) {
        self.load(records, DEFAULT_BRANCH).await
    }

    /// Stamp a batch with the current time and write it to `branch`.
    pub async fn load(&self, records: Vec<EventRecord>, branch: &str) {
        self.load_at(records, branch, Utc::now()).await
    }

    /// Stamp a batch with `at` and write it to `branch`.
    ///
    /// All records of the batch share one `ts`. Never fails: write errors are
    /// logged and counted.
    pub async fn load_at(&self, mut records: Vec<EventRecord>, branch: &str, at: DateTime<Utc>) {
        let count = records.len();
        let ts = ingestion_timestamp(at);
        stamp_batch(&mut records, &ts);

        let data = match encode_batch(&records) {
            Ok(data) => data,
            Err(e) => {
                warn!("unable to encode batch for {}: {}", self.name, e);
                self.stats.record_failure(count);
                telemetry::record_load_failure(&self.name, count);
                return;
            }
        };

        let result = {
            let _guard = self.lock.lock().await;
            self.client.write(&self.name, &data, branch).await
        };

        match result {
            Ok(()) => {
                debug!("loaded {} records to {}@{}", count, self.name, branch);
                self.stats.record_success(count);
                telemetry::record_load(&self.name, count);
            }
            Err(e) => {
                warn!("unable to load {} to {}: {}", data, self.name, e);
                self.stats.record_failure(count);
                telemetry::record_load_failure(&self.name, count);
            }
        }
    }

    /// Run a query against this pool's stream. Errors propagate.
    pub async fn query(&self, expression: &str) -> Result<Vec<Value>, PoolError> {
        telemetry::record_query(&self.name);
        Ok(self.client.query(&self.name, expression).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::lake::InMemoryLake;
    use chrono::TimeZone;
    use serde_json::json;

    fn records(value: Value) -> Vec<EventRecord> {
        crate::domain::event::records_from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_load_stamps_and_writes() {
        let lake = Arc::new(InMemoryLake::new());
        let pool = IngestionPool::new("l1", lake.clone());
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

        pool.load_at(records(json!([{"ts": 100, "val": "a"}])), "main", at)
            .await;

        assert_eq!(
            lake.records("l1", "main"),
            vec![json!({"event_ts": 100, "val": "a", "ts": "2026-10-19T08:30:00.000000Z"})]
        );
        assert_eq!(pool.stats().loaded_records, 1);
    }

    #[tokio::test]
    async fn test_batch_shares_timestamp() {
        let lake = Arc::new(InMemoryLake::new());
        let pool = IngestionPool::new("l1", lake.clone());

        pool.load_default(records(json!([{"a": 1}, {"a": 2, "ts": 5}, {"a": 3}])))
            .await;

        let stored = lake.records("l1", "main");
        assert_eq!(stored.len(), 3);
        let ts = &stored[0]["ts"];
        assert!(ts.is_string());
        assert!(stored.iter().all(|r| &r["ts"] == ts));
        assert_eq!(stored[1]["event_ts"], json!(5));
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed_and_counted() {
        let lake = Arc::new(InMemoryLake::new());
        lake.fail_writes(true);
        let pool = IngestionPool::new("l1", lake.clone());

        pool.load_default(records(json!([{"a": 1}, {"a": 2}]))).await;

        let stats = pool.stats();
        assert_eq!(stats.failed_loads, 1);
        assert_eq!(stats.dropped_records, 2);
        assert_eq!(stats.loaded_batches, 0);

        // the lock was released despite the failure
        lake.fail_writes(false);
        pool.load_default(records(json!({"a": 3}))).await;
        assert_eq!(pool.stats().loaded_batches, 1);
    }

    #[tokio::test]
    async fn test_branch_is_honoured() {
        let lake = Arc::new(InMemoryLake::new());
        let pool = IngestionPool::new("l1", lake.clone());
        pool.load(records(json!({"a": 1})), "staging").await;
        assert!(lake.records("l1", "main").is_empty());
        assert_eq!(lake.records("l1", "staging").len(), 1);
    }

    #[tokio::test]
    async fn test_query_errors_propagate() {
        let pool = IngestionPool::new("l1", Arc::new(InMemoryLake::new()));
        assert!(matches!(
            pool.query("count()").await,
            Err(PoolError::Lake(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_writers_keep_batches_whole() {
        let lake = Arc::new(InMemoryLake::new());
        let pool = Arc::new(IngestionPool::new("l1", lake.clone()));

        let mut handles = Vec::new();
        for writer in 0..8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let batch = (0..10).map(|i| json!({"writer": writer, "i": i})).collect();
                pool.load_default(records(Value::Array(batch))).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = lake.records("l1", "main");
        assert_eq!(stored.len(), 80);
        for chunk in stored.chunks(10) {
            let writer = &chunk[0]["writer"];
            assert!(chunk.iter().all(|r| &r["writer"] == writer));
            let ts = &chunk[0]["ts"];
            assert!(chunk.iter().all(|r| &r["ts"] == ts));
        }
    }
}
