// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer for intent retrieval

pub mod catalog;
pub mod encoder;

pub use catalog::{CatalogError, HomeCatalog};
pub use encoder::{create_encoder, HashingEncoder, OllamaEncoder};
