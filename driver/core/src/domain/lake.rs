// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Lake Client Trait - Anti-Corruption Layer for the event data lake
//!
//! Pools write to and query a remote lake addressed by stream (pool) name and
//! branch. The lake itself is opaque; implementations live in
//! `infrastructure::lake`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Branch used when a caller does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Remote store a pool delegates to.
#[async_trait]
pub trait LakeClient: Send + Sync {
    /// Append an encoded batch to `stream` on `branch`.
    async fn write(&self, stream: &str, data: &str, branch: &str) -> Result<(), LakeError>;

    /// Evaluate a query expression in the context of `stream`.
    async fn query(&self, stream: &str, expression: &str) -> Result<Vec<Value>, LakeError>;

    /// Short backend name for logs and metrics labels
    fn backend(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum LakeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Lake returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed lake data: {0}")]
    Decode(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("Write rejected: {0}")]
    Rejected(String),
}
