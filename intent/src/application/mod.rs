// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod ranker;
pub mod retrieval;

pub use ranker::{cosine, top_k, RankError};
pub use retrieval::{RetrievalService, DEFAULT_TOP_K};
