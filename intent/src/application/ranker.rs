// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Cosine similarity ranking.
//!
//! Candidates are sorted by ascending score with a stable sort, the last `k`
//! are kept and reversed. The result is most-similar first, and among equal
//! scores the candidate with the larger index comes first. NaN scores (from
//! zero-norm vectors) order above every number.

use std::cmp::Ordering;

pub use crate::domain::RankError;

/// Cosine similarity of two equally sized vectors, accumulated in f64.
///
/// NaN when either vector has zero norm.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Score every candidate against the query.
pub fn scores(query: &[f32], candidates: &[Vec<f32>]) -> Result<Vec<f64>, RankError> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            if candidate.len() != query.len() {
                return Err(RankError::DimensionMismatch {
                    index,
                    expected: query.len(),
                    actual: candidate.len(),
                });
            }
            Ok(cosine(query, candidate))
        })
        .collect()
}

/// Indices of the `min(k, candidates.len())` candidates most similar to
/// `query`, most similar first.
pub fn top_k(query: &[f32], candidates: &[Vec<f32>], k: usize) -> Result<Vec<usize>, RankError> {
    let scores = scores(query, candidates)?;

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| ascending(scores[a], scores[b]));

    let keep = k.min(order.len());
    Ok(order[order.len() - keep..].iter().rev().copied().collect())
}

fn ascending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
