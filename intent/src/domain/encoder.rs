// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Embedding Encoder Domain Interface (Anti-Corruption Layer)
//
// Maps text to fixed-width vectors. Implementations live in
// infrastructure/encoder/: a local hashing encoder and an HTTP client for a
// sentence-transformers model served by Ollama.

use async_trait::async_trait;
use thiserror::Error;

/// Domain interface for embedding models
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode every input string, preserving order.
    ///
    /// Returns one vector of [`dimensions`](Self::dimensions) floats per input.
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError>;

    /// Vector width; `None` when only known after the first call
    fn dimensions(&self) -> Option<usize>;

    /// Model identifier
    fn model(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Encoder service error: {0}")]
    Provider(String),

    #[error("Expected {expected} embeddings, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Unknown encoder backend: {0}")]
    UnknownBackend(String),
}
