//! Configuration system for verso.

use serde::{Deserialize, Serialize};

use crate::error::{VersoError, VersoResult};

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of file histories to reserve space for up front.
    pub initial_capacity: usize,
    /// Largest accepted payload in bytes (None = unlimited).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_payload_bytes: Option<usize>,
    /// Longest accepted file identifier in bytes.
    pub max_file_id_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            max_payload_bytes: None,
            max_file_id_len: 4096,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VersoResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| VersoError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| VersoError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| VersoError::Configuration(e.to_string()))?,
            _ => {
                return Err(VersoError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `VERSO_INITIAL_CAPACITY` (default: 64)
    /// - `VERSO_MAX_PAYLOAD_BYTES` (default: unlimited)
    /// - `VERSO_MAX_FILE_ID_LEN` (default: 4096)
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("VERSO_INITIAL_CAPACITY") {
            match capacity.parse() {
                Ok(n) => config.initial_capacity = n,
                Err(_) => tracing::warn!("Ignoring invalid VERSO_INITIAL_CAPACITY: {}", capacity),
            }
        }

        if let Ok(limit) = std::env::var("VERSO_MAX_PAYLOAD_BYTES") {
            match limit.parse() {
                Ok(n) => config.max_payload_bytes = Some(n),
                Err(_) => tracing::warn!("Ignoring invalid VERSO_MAX_PAYLOAD_BYTES: {}", limit),
            }
        }

        if let Ok(len) = std::env::var("VERSO_MAX_FILE_ID_LEN") {
            match len.parse::<usize>() {
                Ok(n) if n > 0 => config.max_file_id_len = n,
                _ => tracing::warn!("Ignoring invalid VERSO_MAX_FILE_ID_LEN: {}", len),
            }
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> VersoResult<()> {
        if self.max_file_id_len == 0 {
            return Err(VersoError::Configuration(
                "max_file_id_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for StoreConfig.
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the initial map capacity.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the payload size limit.
    pub fn max_payload_bytes(mut self, limit: usize) -> Self {
        self.config.max_payload_bytes = Some(limit);
        self
    }

    /// Set the file identifier length limit.
    pub fn max_file_id_len(mut self, len: usize) -> Self {
        self.config.max_file_id_len = len;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StoreConfig {
        self.config
    }
}
