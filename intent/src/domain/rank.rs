// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

/// Ranking failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("candidate {index} has {actual} dimensions, query has {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
