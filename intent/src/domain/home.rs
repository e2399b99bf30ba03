// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Home
//!
//! Read-only view over a home document: its declared name and the names of
//! the resources mounted beneath it.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Turns a home document into the text it is searched by

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::RetrievalError;

/// A home-like document (`metadata.name` plus a `spec.mount` tree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HomeDocument(Value);

impl HomeDocument {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Declared name (`metadata.name`).
    pub fn name(&self) -> Result<&str, RetrievalError> {
        self.0
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .ok_or(RetrievalError::MissingName)
    }

    /// Mount tree (`spec.mount`), if the document has one.
    pub fn mount(&self) -> Option<&Map<String, Value>> {
        self.0.pointer("/spec/mount").and_then(Value::as_object)
    }

    /// Names of all mounted resources, depth-first in document order.
    pub fn mount_names(&self) -> Vec<String> {
        self.mount().map(extract_mount_names).unwrap_or_default()
    }

    /// The text this home is matched against: its name followed by every
    /// mounted resource name, space separated.
    pub fn corpus_text(&self) -> Result<String, RetrievalError> {
        Ok(format!("{} {}", self.name()?, self.mount_names().join(" ")))
    }
}

impl From<Value> for HomeDocument {
    fn from(document: Value) -> Self {
        Self(document)
    }
}

/// Collect resource names from a mount tree.
///
/// A mapping with a `name` field contributes that name and is not descended
/// into; a mapping without one is recursed into. Anything that is not a
/// mapping contributes nothing.
pub fn extract_mount_names(mount: &Map<String, Value>) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(mount, &mut names);
    names
}

fn collect_names(node: &Map<String, Value>, names: &mut Vec<String>) {
    for value in node.values() {
        let Value::Object(child) = value else {
            continue;
        };
        match child.get("name") {
            Some(Value::String(name)) => names.push(name.clone()),
            Some(other) => names.push(other.to_string()),
            None => collect_names(child, names),
        }
    }
}
