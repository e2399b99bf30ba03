// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Resource Identity
//!
//! Derives the logical stream (pool) name a driver writes its events to.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Maps a (group, version, resource, name, namespace) tuple to a stream name

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace that is elided from derived stream names.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identity of the controller-managed resource a driver is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub version: String,

    /// Plural resource type (e.g. "lamps")
    #[serde(default)]
    pub resource: String,

    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl ResourceIdentity {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Build the identity from the variables a controller injects into a driver
    /// (`GROUP`, `VERSION`, `PLURAL`, `NAME`, `NAMESPACE`).
    ///
    /// Returns `None` when `NAME` is unset.
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).unwrap_or_default();
        let name = std::env::var("NAME").ok().filter(|n| !n.is_empty())?;
        let namespace = std::env::var("NAMESPACE")
            .ok()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(default_namespace);

        Some(Self {
            group: var("GROUP"),
            version: var("VERSION"),
            resource: var("PLURAL"),
            name,
            namespace,
        })
    }

    /// Stream name for this identity, see [`resolve`].
    pub fn stream_name(&self) -> String {
        resolve(
            &self.group,
            &self.version,
            &self.resource,
            &self.name,
            &self.namespace,
        )
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.group, self.version, self.resource, self.namespace, self.name
        )
    }
}

/// Resolve the stream name for a resource.
///
/// `name` for the default namespace, `"{namespace}-{name}"` otherwise.
/// Group, version and resource type are part of the signature but do not
/// contribute to the name: two resource types sharing a name and namespace
/// resolve to the same stream.
pub fn resolve(
    _group: &str,
    _version: &str,
    _resource: &str,
    name: &str,
    namespace: &str,
) -> String {
    if namespace == DEFAULT_NAMESPACE {
        name.to_string()
    } else {
        format!("{}-{}", namespace, name)
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}
