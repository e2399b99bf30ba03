// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # RetrievalService: intent query over a home catalog
//!
//! Builds one text per home (its name plus every mounted resource name),
//! encodes the query together with those texts in a single batch, ranks the
//! homes by cosine similarity and returns references to the best matches.
//!
//! The vector index is rebuilt on every call; nothing is cached between
//! requests.

use std::sync::Arc;
use tracing::debug;

use super::ranker::top_k;
use crate::domain::{Encoder, EncoderError, HomeDocument, RetrievalError};

/// Homes returned by default per query.
pub const DEFAULT_TOP_K: usize = 3;

pub struct RetrievalService {
    encoder: Arc<dyn Encoder>,
    top_k: usize,
}

impl RetrievalService {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self {
            encoder,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn encoder(&self) -> &Arc<dyn Encoder> {
        &self.encoder
    }

    /// Retrieve with the service's configured `k`.
    pub async fn search<'a>(
        &self,
        query: &str,
        homes: &'a [HomeDocument],
    ) -> Result<Vec<&'a HomeDocument>, RetrievalError> {
        self.retrieve(query, homes, self.top_k).await
    }

    /// The `k` homes most similar to `query`, most similar first.
    pub async fn retrieve<'a>(
        &self,
        query: &str,
        homes: &'a [HomeDocument],
        k: usize,
    ) -> Result<Vec<&'a HomeDocument>, RetrievalError> {
        if homes.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut texts = Vec::with_capacity(homes.len() + 1);
        texts.push(query.to_string());
        for home in homes {
            texts.push(home.corpus_text()?);
        }

        let mut vectors = self.encoder.encode(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EncoderError::Shape {
                expected: texts.len(),
                actual: vectors.len(),
            }
            .into());
        }
        let candidates = vectors.split_off(1);
        let query_vector = &vectors[0];

        let ranked = top_k(query_vector, &candidates, k)?;
        debug!("query {:?} ranked homes {:?}", query, ranked);

        Ok(ranked.into_iter().map(|i| &homes[i]).collect())
    }
}
