// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Event pools for digi drivers: resource identity, provider selection,
//! ingestion and lake access.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Implements the ingestion write path and pool query read path

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
