// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process lake used by the `memory` pool provider and by tests.
//!
//! Records are kept per (stream, branch). Queries run against the `main`
//! branch and understand `*` and a single `field==value` filter.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::lake::{LakeClient, LakeError, DEFAULT_BRANCH};

#[derive(Default)]
pub struct InMemoryLake {
    records: RwLock<HashMap<(String, String), Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl InMemoryLake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Everything stored for `stream` on `branch`, in load order.
    pub fn records(&self, stream: &str, branch: &str) -> Vec<Value> {
        self.records
            .read()
            .get(&(stream.to_string(), branch.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn parse_filter(expression: &str) -> Result<Option<(String, Value)>, LakeError> {
        let expression = expression.trim();
        if expression.is_empty() || expression == "*" {
            return Ok(None);
        }

        let (field, raw) = expression
            .split_once("==")
            .ok_or_else(|| LakeError::UnsupportedQuery(expression.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(LakeError::UnsupportedQuery(expression.to_string()));
        }

        let raw = raw.trim();
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok(Some((field.to_string(), value)))
    }
}

#[async_trait]
impl LakeClient for InMemoryLake {
    async fn write(&self, stream: &str, data: &str, branch: &str) -> Result<(), LakeError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LakeError::Rejected(format!("writes to {} disabled", stream)));
        }

        let batch = serde_json::Deserializer::from_str(data)
            .into_iter::<Value>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LakeError::Decode(e.to_string()))?;

        self.records
            .write()
            .entry((stream.to_string(), branch.to_string()))
            .or_default()
            .extend(batch);
        Ok(())
    }

    async fn query(&self, stream: &str, expression: &str) -> Result<Vec<Value>, LakeError> {
        let filter = Self::parse_filter(expression)?;
        let records = self.records(stream, DEFAULT_BRANCH);

        Ok(match filter {
            None => records,
            Some((field, expected)) => records
                .into_iter()
                .filter(|record| record.get(&field) == Some(&expected))
                .collect(),
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
