// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Intent retrieval: find the homes most relevant to a free-text query.
//!
//! # Architecture
//!
//! - **Layer:** Retrieval Layer
//! - **Purpose:** Encodes a query and a home catalog, ranks homes by cosine similarity

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
