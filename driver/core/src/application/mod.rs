// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod ingestion_pool;
pub mod pool_handle;
pub mod pool_registry;

pub use ingestion_pool::IngestionPool;
pub use pool_handle::PoolHandle;
pub use pool_registry::PoolRegistry;
