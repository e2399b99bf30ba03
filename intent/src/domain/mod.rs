// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Home documents, the encoder contract and retrieval errors.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Types shared by the retrieval path

pub mod encoder;
pub mod home;
pub mod rank;

pub use encoder::{Encoder, EncoderError};
pub use home::{extract_mount_names, HomeDocument};
pub use rank::RankError;

use thiserror::Error;

/// Errors surfaced by a retrieval request
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("home document has no metadata.name")]
    MissingName,

    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error(transparent)]
    Rank(#[from] RankError),
}
