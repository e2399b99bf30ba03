// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Encoder Infrastructure Module
//!
//! Concrete implementations of the Encoder trait, selected by
//! `spec.intent.encoder.backend`.

pub mod hashing;
pub mod ollama;

pub use hashing::HashingEncoder;
pub use ollama::OllamaEncoder;

use std::sync::Arc;
use tracing::info;

use crate::domain::{Encoder, EncoderError};
use digi_core::domain::config::EncoderConfig;

/// Factory function to create an encoder from configuration
pub fn create_encoder(config: &EncoderConfig) -> Result<Arc<dyn Encoder>, EncoderError> {
    let encoder: Arc<dyn Encoder> = match config.backend.as_str() {
        "hashing" => Arc::new(HashingEncoder::new(config.dimensions)),
        "ollama" => Arc::new(OllamaEncoder::new(
            config.endpoint.clone(),
            config.model.clone(),
        )),
        other => return Err(EncoderError::UnknownBackend(other.to_string())),
    };

    info!("Using {} encoder (model {})", config.backend, encoder.model());
    Ok(encoder)
}
