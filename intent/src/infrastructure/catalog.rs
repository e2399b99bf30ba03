// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Home catalog loading.
//!
//! The catalog is a folder of `home1.yaml` .. `homeN.yaml`. Files are read
//! concurrently, one task each, and joined in file order before the homes are
//! handed to ranking.

use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::HomeDocument;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("catalog loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct HomeCatalog {
    dir: PathBuf,
    size: usize,
}

impl HomeCatalog {
    pub fn new(dir: impl Into<PathBuf>, size: usize) -> Self {
        Self {
            dir: dir.into(),
            size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the catalog files, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        (1..=self.size)
            .map(|i| self.dir.join(format!("home{}.yaml", i)))
            .collect()
    }

    /// Load every home. Any unreadable or malformed file fails the load.
    pub async fn load(&self) -> Result<Vec<HomeDocument>, CatalogError> {
        let tasks = self
            .paths()
            .into_iter()
            .map(|path| tokio::spawn(load_home(path)));

        let homes = try_join_all(tasks)
            .await?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        debug!("loaded {} homes from {}", homes.len(), self.dir.display());
        Ok(homes)
    }
}

async fn load_home(path: PathBuf) -> Result<HomeDocument, CatalogError> {
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
    let document = serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok(HomeDocument::new(document))
}
