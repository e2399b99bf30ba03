// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Domain types for digi drivers.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Identity, event records, pool and lake contracts, configuration

pub mod config;
pub mod event;
pub mod identity;
pub mod lake;
pub mod pool;

pub use event::EventRecord;
pub use identity::{resolve, ResourceIdentity};
pub use lake::{LakeClient, LakeError, DEFAULT_BRANCH};
pub use pool::{PoolError, PoolProvider, PoolStats, PoolStatsSnapshot};
