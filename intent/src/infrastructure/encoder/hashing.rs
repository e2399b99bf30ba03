// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Hashing Encoder
//!
//! Local, deterministic embeddings for air-gapped drivers and tests.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements the Encoder trait without a model server

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{Encoder, EncoderError};

/// Default width, matching MiniLM sentence embeddings.
pub const DEFAULT_DIMENSIONS: usize = 384;

const MODEL_NAME: &str = "hashing-trigram";

/// Weight of one character trigram relative to a whole token.
const NGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing encoder.
///
/// Every token contributes itself plus the character trigrams of `<token>`,
/// so a term buried in a longer token (`kitchen` in `smartkitchen-hub`)
/// still shares buckets with it. Features are hashed with blake3 into a
/// signed bucket, summed, then L2 normalized. Identical texts map to
/// identical vectors; only text without any alphanumeric character maps to
/// the zero vector.
pub struct HashingEncoder {
    dimensions: usize,
}

impl HashingEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Lowercase alphanumeric runs.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// Boundary-padded character trigrams of a token.
    fn trigrams(token: &str) -> Vec<String> {
        let padded: Vec<char> = std::iter::once('<')
            .chain(token.chars())
            .chain(std::iter::once('>'))
            .collect();
        padded.windows(3).map(|w| w.iter().collect()).collect()
    }

    fn features(text: &str) -> BTreeMap<String, f32> {
        let mut features: BTreeMap<String, f32> = BTreeMap::new();
        for token in Self::tokenize(text) {
            for gram in Self::trigrams(&token) {
                *features.entry(gram).or_default() += NGRAM_WEIGHT;
            }
            *features.entry(token).or_default() += 1.0;
        }
        features
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let hash = blake3::hash(feature.as_bytes());
        let bytes = hash.as_bytes();
        let mut index = [0u8; 8];
        index.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(index) % self.dimensions as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (feature, weight) in Self::features(text) {
            let (bucket, sign) = self.bucket(&feature);
            vector[bucket] += sign * weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

#[async_trait]
impl Encoder for HashingEncoder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn model(&self) -> &str {
        MODEL_NAME
    }
}
