// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Lake Infrastructure Module
//!
//! Concrete implementations of the LakeClient trait, one per pool provider.

pub mod memory;
pub mod zed;

pub use memory::InMemoryLake;
pub use zed::ZedLakeClient;

use std::sync::Arc;

use crate::domain::config::PoolConfig;
use crate::domain::lake::LakeClient;
use crate::domain::pool::PoolProvider;

/// Factory function to create the lake client backing a provider
pub fn create_lake_client(provider: PoolProvider, config: &PoolConfig) -> Arc<dyn LakeClient> {
    match provider {
        PoolProvider::Zed => Arc::new(ZedLakeClient::new(config.lake_url.clone())),
        PoolProvider::Memory => Arc::new(InMemoryLake::new()),
    }
}
