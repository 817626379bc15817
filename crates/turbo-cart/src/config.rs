//! Cart configuration.
//!
//! Loaded from TOML (or JSON when the file ends in `.json`). Every section
//! and field has a default, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default snapshot key.
pub const DEFAULT_CART_KEY: &str = "turbo-cart:cart";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to parse JSON.
    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to render the config.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storefront API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CartConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if is_json(path) {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.render(is_json(path))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as TOML, or as pretty JSON.
    pub fn render(&self, json: bool) -> Result<String, ConfigError> {
        if json {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        } else {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Storefront API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the storefront API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for server errors, timeouts and connection failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the cart snapshot is stored under.
    #[serde(default = "default_key")]
    pub key: String,

    /// Storage file, relative to the working directory.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_path() -> PathBuf {
    PathBuf::from(".cart").join("storage.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            path: default_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: CartConfig = toml::from_str("").unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage.key, "turbo-cart:cart");
        assert_eq!(config.api.base_url, "http://localhost:3333");
    }

    #[test]
    fn test_partial_section() {
        let config: CartConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://shop.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("cart.toml");
        std::fs::write(&toml_path, "[storage]\nkey = \"shop:cart\"\n").unwrap();
        assert_eq!(CartConfig::load(&toml_path).unwrap().storage.key, "shop:cart");

        let json_path = dir.path().join("cart.json");
        std::fs::write(&json_path, r#"{"api":{"max_retries":0}}"#).unwrap();
        assert_eq!(CartConfig::load(&json_path).unwrap().api.max_retries, 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CartConfig::default();
        config.api.timeout_ms = 250;

        for name in ["cart.toml", "cart.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(CartConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CartConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\n").unwrap();
        assert!(matches!(CartConfig::load(&bad), Err(ConfigError::Toml { .. })));
    }
}
