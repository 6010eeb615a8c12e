//! Configuration file support for the commitment tree tools.
//!
//! This module provides configuration file loading from TOML format,
//! so the tree depth and file limits can be pinned per deployment.

use crate::accumulator::MAX_TREE_DEPTH;
use crate::DEFAULT_TREE_DEPTH;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_MAX_EVENTS_FILE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_WITNESS_FILE_SIZE: u64 = 1024 * 1024;
const DEFAULT_TIMESTAMP_TOLERANCE_SECS: u64 = 300;
const DEFAULT_TIMESTAMP_MAX_AGE_SECS: u64 = 86400;

/// Upper bound for both timestamp windows (ten years).
pub const MAX_TIMESTAMP_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Environment variable overriding `[tree] depth`.
pub const TREE_DEPTH_ENV: &str = "ZKTREE_TREE_DEPTH";

/// Configuration for the commitment tree tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub witness: WitnessConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Must match the depth the circuit and the on-chain tree were built with.
    #[serde(default = "default_tree_depth")]
    pub depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub events_file: Option<PathBuf>,
    #[serde(default = "default_max_events_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WitnessConfig {
    #[serde(default = "default_witness_output_file")]
    pub output_file: PathBuf,
    #[serde(default = "default_max_witness_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_timestamp_tolerance_secs")]
    pub timestamp_tolerance_secs: u64,
    #[serde(default = "default_timestamp_max_age_secs")]
    pub timestamp_max_age_secs: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_TREE_DEPTH,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            events_file: None,
            max_file_size: DEFAULT_MAX_EVENTS_FILE_SIZE,
        }
    }
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            output_file: default_witness_output_file(),
            max_file_size: DEFAULT_MAX_WITNESS_FILE_SIZE,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            timestamp_tolerance_secs: DEFAULT_TIMESTAMP_TOLERANCE_SECS,
            timestamp_max_age_secs: DEFAULT_TIMESTAMP_MAX_AGE_SECS,
        }
    }
}

fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

fn default_max_events_file_size() -> u64 {
    DEFAULT_MAX_EVENTS_FILE_SIZE
}

fn default_witness_output_file() -> PathBuf {
    PathBuf::from("witness.json")
}

fn default_max_witness_file_size() -> u64 {
    DEFAULT_MAX_WITNESS_FILE_SIZE
}

fn default_timestamp_tolerance_secs() -> u64 {
    DEFAULT_TIMESTAMP_TOLERANCE_SECS
}

fn default_timestamp_max_age_secs() -> u64 {
    DEFAULT_TIMESTAMP_MAX_AGE_SECS
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn load_from_file_or_default(path: &Path) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Applies `ZKTREE_TREE_DEPTH` if it is set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(TREE_DEPTH_ENV) {
            self.tree.depth = value.trim().parse().with_context(|| {
                format!("{TREE_DEPTH_ENV} must be a positive integer, got '{value}'")
            })?;
            debug!("Tree depth overridden from environment: {}", self.tree.depth);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tree.depth == 0 || self.tree.depth > MAX_TREE_DEPTH {
            return Err(anyhow::anyhow!(
                "Invalid tree depth {}: must be between 1 and {}",
                self.tree.depth,
                MAX_TREE_DEPTH
            ));
        }
        if self.security.timestamp_max_age_secs == 0 {
            return Err(anyhow::anyhow!(
                "security.timestamp_max_age_secs must be greater than zero"
            ));
        }
        for (name, value) in [
            (
                "timestamp_tolerance_secs",
                self.security.timestamp_tolerance_secs,
            ),
            ("timestamp_max_age_secs", self.security.timestamp_max_age_secs),
        ] {
            if value > MAX_TIMESTAMP_WINDOW_SECS {
                return Err(anyhow::anyhow!(
                    "security.{} is {}s, above the limit of {}s",
                    name,
                    value,
                    MAX_TIMESTAMP_WINDOW_SECS
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tree.depth, DEFAULT_TREE_DEPTH);
        assert_eq!(config.ledger.max_file_size, DEFAULT_MAX_EVENTS_FILE_SIZE);
        assert_eq!(config.witness.output_file, PathBuf::from("witness.json"));
        assert_eq!(
            config.security.timestamp_tolerance_secs,
            DEFAULT_TIMESTAMP_TOLERANCE_SECS
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize_config() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.tree.depth, deserialized.tree.depth);
        assert_eq!(config.witness.output_file, deserialized.witness.output_file);
    }

    #[test]
    fn test_custom_config() {
        let config_toml = r#"
            [tree]
            depth = 10

            [ledger]
            events_file = "events.json"
            max_file_size = 20485760

            [security]
            timestamp_tolerance_secs = 600
        "#;

        let config: Config = toml::from_str(config_toml).unwrap();
        assert_eq!(config.tree.depth, 10);
        assert_eq!(config.ledger.events_file, Some(PathBuf::from("events.json")));
        assert_eq!(config.ledger.max_file_size, 20485760);
        assert_eq!(config.security.timestamp_tolerance_secs, 600);
        assert_eq!(
            config.security.timestamp_max_age_secs,
            DEFAULT_TIMESTAMP_MAX_AGE_SECS
        );
    }

    #[test]
    fn test_validate_rejects_bad_depth() {
        let mut config = Config::default();
        config.tree.depth = 0;
        assert!(config.validate().is_err());
        config.tree.depth = MAX_TREE_DEPTH + 1;
        assert!(config.validate().is_err());
        config.tree.depth = MAX_TREE_DEPTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_timestamp_windows() {
        let mut config = Config::default();
        config.security.timestamp_tolerance_secs = u64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timestamp_tolerance_secs"));

        config.security.timestamp_tolerance_secs = MAX_TIMESTAMP_WINDOW_SECS;
        assert!(config.validate().is_ok());

        config.security.timestamp_max_age_secs = u64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timestamp_max_age_secs"));

        config.security.timestamp_max_age_secs = MAX_TIMESTAMP_WINDOW_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("zktree.toml");

        let mut config = Config::default();
        config.tree.depth = 12;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.tree.depth, 12);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from_file_or_default(&temp_dir.path().join("missing.toml"));
        assert_eq!(config.tree.depth, DEFAULT_TREE_DEPTH);
    }
}
