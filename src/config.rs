//! Configuration module
//!
//! Reads `config.toml` (default `~/.config/storefront-engine/config.toml`).
//! Every field has a default, so a missing section is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared::errors::InfraError;
use crate::shared::utills::RetryConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub location: LocationSection,
    pub catalog: CatalogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// e.g. "sqlite://./storefront.db?mode=rwc"
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./storefront.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSection {
    /// Coordinates farther than this from every area are not serviceable
    pub max_match_distance_km: f64,
    pub retry_attempts: u32,
    pub retry_initial_delay_ms: u64,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            max_match_distance_km: 25.0,
            retry_attempts: 3,
            retry_initial_delay_ms: 200,
        }
    }
}

impl LocationSection {
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::new(
            self.retry_attempts,
            std::time::Duration::from_millis(self.retry_initial_delay_ms),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub default_limit: u64,
    pub max_limit: u64,
    /// Serve the global catalog at base price for areas without local pricing
    pub global_fallback: bool,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            global_fallback: true,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))
    }
}

pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storefront-engine")
        .join("config.toml")
}
