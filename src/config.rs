//! Configuration loading from TOML with environment overrides.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults so a missing file still boots the demo
//! setup; `WILDCAT_PORT` and `WILDCAT_STORAGE_PATH` override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use tracing::warn;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub league: LeagueConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 4000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LeagueConfig {
    /// Season all stat lookups resolve against.
    pub season: u16,
    /// Highest week standings fold through by default.
    pub max_week: u32,
    /// Insert the demo league on first boot when the store is empty.
    pub seed_demo: bool,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            season: 2025,
            max_week: 5,
            seed_demo: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Document file used by the `file` backend.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: "wildcat_store.json".to_string(),
        }
    }
}

/// Which `LeagueStore` implementation to run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is
    /// absent or unparseable.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path, error = %e, "Config not loaded, using defaults");
                let mut cfg = AppConfig::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("WILDCAT_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!(port, "Ignoring unparseable WILDCAT_PORT"),
            }
        }
        if let Ok(path) = std::env::var("WILDCAT_STORAGE_PATH") {
            self.storage.path = path;
        }
    }
}
