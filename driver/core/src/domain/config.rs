// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Driver Configuration Types
//
// Defines the configuration schema for a digi driver process, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - The resource identity the driver is bound to
// - Event pool provider and lake endpoint
// - Intent retrieval (catalog, encoder, top-k)
// - Network and observability settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::identity::ResourceIdentity;
use super::lake::DEFAULT_BRANCH;

pub const API_VERSION: &str = "digi.dev/v1";
pub const KIND: &str = "DriverConfig";

/// Lake endpoint used when neither the file nor `ZED_LAKE` set one.
pub const DEFAULT_LAKE_URL: &str = "http://lake:6534";

/// Pretrained sentence embedding model used for intent retrieval.
pub const DEFAULT_EMBEDDING_MODEL: &str = "paraphrase-MiniLM-L6-v2";

/// Top-level Kubernetes-style driver configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigiConfigManifest {
    /// API version (must be "digi.dev/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "DriverConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: DigiConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Driver configuration specification (content under spec:)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigiConfigSpec {
    /// Resource this driver manages; names its event pool
    pub resource: ResourceIdentity,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub intent: IntentConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Provider key: "zed", "memory", "none"/"false" to disable.
    /// Empty selects the default provider.
    #[serde(default)]
    pub provider: String,

    /// Base URL of the Zed lake service
    #[serde(default = "default_lake_url")]
    pub lake_url: String,

    /// Branch events are loaded into
    #[serde(default = "default_branch")]
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Folder holding home1.yaml .. homeN.yaml
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: String,

    /// Number of home documents in the catalog
    #[serde(default = "default_catalog_size")]
    pub catalog_size: usize,

    /// Homes returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub encoder: EncoderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// "hashing" (local, deterministic) or "ollama"
    #[serde(default = "default_encoder_backend")]
    pub backend: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding service endpoint (ollama backend only)
    #[serde(default = "default_encoder_endpoint")]
    pub endpoint: String,

    /// Vector width of the hashing backend
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_lake_url() -> String {
    DEFAULT_LAKE_URL.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_catalog_dir() -> String {
    "../catalog/".to_string()
}

fn default_catalog_size() -> usize {
    5
}

fn default_top_k() -> usize {
    3
}

fn default_encoder_backend() -> String {
    "hashing".to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_encoder_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            lake_url: default_lake_url(),
            branch: default_branch(),
        }
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            catalog_dir: default_catalog_dir(),
            catalog_size: default_catalog_size(),
            top_k: default_top_k(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            backend: default_encoder_backend(),
            model: default_embedding_model(),
            endpoint: default_encoder_endpoint(),
            dimensions: default_dimensions(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

impl Default for DigiConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "digi-driver".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname.clone(),
                labels: None,
            },
            spec: DigiConfigSpec {
                resource: ResourceIdentity::new("", "", "", hostname, "default"),
                pool: PoolConfig::default(),
                intent: IntentConfig::default(),
                network: NetworkConfig::default(),
                observability: ObservabilityConfig::default(),
            },
        }
    }
}

impl DigiConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. DIGI_CONFIG_PATH environment variable
    /// 2. ./digi-config.yaml (working directory)
    /// 3. ~/.digi/config.yaml (user home)
    /// 4. /etc/digi/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("DIGI_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./digi-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".digi").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/digi/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must load
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// `POOL_PROVIDER` is honoured even when set to the empty string, which
    /// selects the default provider.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("POOL_PROVIDER") {
            tracing::info!("Environment override: POOL_PROVIDER={}", provider);
            self.spec.pool.provider = provider;
        }

        if let Some(url) = lookup("ZED_LAKE").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: ZED_LAKE={}", url);
            self.spec.pool.lake_url = url;
        }

        let resource = &mut self.spec.resource;
        for (key, field) in [
            ("GROUP", &mut resource.group),
            ("VERSION", &mut resource.version),
            ("PLURAL", &mut resource.resource),
            ("NAME", &mut resource.name),
            ("NAMESPACE", &mut resource.namespace),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }

        if let Some(backend) = lookup("DIGI_ENCODER").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: DIGI_ENCODER={}", backend);
            self.spec.intent.encoder.backend = backend;
        }

        if let Some(dir) = lookup("DIGI_CATALOG_DIR").filter(|v| !v.is_empty()) {
            self.spec.intent.catalog_dir = dir;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.resource.name.is_empty() {
            anyhow::bail!("spec.resource.name cannot be empty");
        }

        if self.spec.pool.branch.is_empty() {
            anyhow::bail!("spec.pool.branch cannot be empty");
        }

        if self.spec.intent.top_k == 0 {
            anyhow::bail!("spec.intent.top_k must be at least 1");
        }

        if self.spec.intent.encoder.dimensions == 0 {
            anyhow::bail!("spec.intent.encoder.dimensions must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_manifest() {
        let manifest = DigiConfigManifest::default();
        assert_eq!(manifest.api_version, "digi.dev/v1");
        assert_eq!(manifest.kind, "DriverConfig");
        assert!(!manifest.metadata.name.is_empty());
        assert_eq!(manifest.spec.pool.provider, "");
        assert_eq!(manifest.spec.pool.lake_url, "http://lake:6534");
        assert_eq!(manifest.spec.pool.branch, "main");
        assert_eq!(manifest.spec.intent.top_k, 3);
        assert_eq!(manifest.spec.intent.encoder.model, "paraphrase-MiniLM-L6-v2");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let yaml = r#"
apiVersion: digi.dev/v1
kind: DriverConfig
metadata:
  name: lamp-driver
spec:
  resource:
    group: digi.dev
    version: v1
    resource: lamps
    name: l1
"#;
        let manifest = DigiConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.spec.resource.namespace, "default");
        assert_eq!(manifest.spec.resource.stream_name(), "l1");
        assert_eq!(manifest.spec.intent.catalog_size, 5);
        assert_eq!(manifest.spec.network.port, 5000);
        assert!(manifest.spec.observability.metrics.enabled);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut manifest = DigiConfigManifest::default();
        manifest.spec.pool.provider = "memory".to_string();
        manifest.spec.intent.top_k = 7;

        let yaml = manifest.to_yaml_string().unwrap();
        let parsed = DigiConfigManifest::from_yaml_str(&yaml).unwrap();

        assert_eq!(parsed.spec.pool.provider, "memory");
        assert_eq!(parsed.spec.intent.top_k, 7);
        assert_eq!(parsed.spec.resource, manifest.spec.resource);
    }

    #[test]
    fn test_env_overrides() {
        let mut manifest = DigiConfigManifest::default();
        manifest.apply_overrides_from(env(&[
            ("POOL_PROVIDER", "none"),
            ("ZED_LAKE", "http://localhost:9867"),
            ("GROUP", "digi.dev"),
            ("VERSION", "v1"),
            ("PLURAL", "rooms"),
            ("NAME", "kitchen"),
            ("NAMESPACE", "home"),
            ("DIGI_ENCODER", "ollama"),
        ]));

        assert_eq!(manifest.spec.pool.provider, "none");
        assert_eq!(manifest.spec.pool.lake_url, "http://localhost:9867");
        assert_eq!(manifest.spec.resource.resource, "rooms");
        assert_eq!(manifest.spec.resource.stream_name(), "home-kitchen");
        assert_eq!(manifest.spec.intent.encoder.backend, "ollama");
    }

    #[test]
    fn test_empty_provider_override_selects_default() {
        let mut manifest = DigiConfigManifest::default();
        manifest.spec.pool.provider = "memory".to_string();
        manifest.apply_overrides_from(env(&[("POOL_PROVIDER", ""), ("NAMESPACE", "")]));
        assert_eq!(manifest.spec.pool.provider, "");
        assert_eq!(manifest.spec.resource.namespace, "default");
    }

    #[test]
    fn test_validation() {
        let mut manifest = DigiConfigManifest::default();
        assert!(manifest.validate().is_ok());

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        manifest.spec.resource.name.clear();
        assert!(manifest.validate().is_err());
        manifest.spec.resource.name = "l1".to_string();

        manifest.spec.intent.top_k = 0;
        assert!(manifest.validate().is_err());
        manifest.spec.intent.top_k = 3;

        manifest.spec.pool.branch.clear();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(DigiConfigManifest::load_or_default(Some(missing)).is_err());
    }

    #[test]
    fn test_explicit_path_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digi-config.yaml");
        let mut manifest = DigiConfigManifest::default();
        manifest.metadata.name = "from-file".to_string();
        std::fs::write(&path, manifest.to_yaml_string().unwrap()).unwrap();

        let loaded = DigiConfigManifest::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.metadata.name, "from-file");
    }
}
