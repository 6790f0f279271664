//! Optional TOML configuration.
//!
//! The CLI works with no configuration file at all; when one is present it
//! supplies defaults the command line can override: the network to query,
//! the confidence level, and custom RPC URLs (including networks not in the
//! built-in table).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Default network name when `--network` is not given.
    #[serde(default)]
    pub network: Option<String>,
    /// Default confidence level when `--confidence` is not given.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Per-network RPC URL overrides, keyed by network name.
    #[serde(default)]
    pub networks: HashMap<String, String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load configuration if the file exists; a missing file is not an error.
    pub fn load_optional(path: &str) -> Result<Option<Self>> {
        if !Path::new(path).exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// RPC URL override for a network, if configured.
    pub fn rpc_url(&self, network: &str) -> Option<&str> {
        self.networks.get(network).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
