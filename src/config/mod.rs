//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file consulted by [`AppConfig::load`] when present.
pub const DEFAULT_CONFIG_FILE: &str = "biztime.yaml";

/// Runtime configuration for the API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string; when absent the in-memory backend is used
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply environment overrides (`BIZTIME_ADDR`, `DATABASE_URL`)
    pub fn apply_env(mut self) -> Self {
        if let Ok(addr) = std::env::var("BIZTIME_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        self
    }

    /// Load the effective configuration: `biztime.yaml` when present,
    /// defaults otherwise, environment overrides on top.
    pub fn load() -> Result<Self> {
        let config = if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_yaml_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };
        Ok(config.apply_env())
    }
}
