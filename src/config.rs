//! Configuration management for Retrace
//!
//! This module handles loading, validating, and managing configuration:
//! where the history file and trace directory live, which shell format to
//! parse, and how large the retrieval buffer starts out.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".retrace.json";

/// Directory under the home directory where traces are kept
pub const DEFAULT_TRACES_DIR: &str = ".retrace/traces";

/// Environment variable overriding the retrieval buffer capacity
pub const CAPACITY_ENV_VAR: &str = "HISTFILESIZE";

/// Main configuration structure for Retrace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding per-command output trace files
    pub traces_dir: PathBuf,

    /// Path to the shell history file to read entries from
    pub history_file: PathBuf,

    /// History file format: "zsh" or "bash"
    pub shell: String,

    /// Initial capacity of the all-history retrieval buffer
    pub capacity: usize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let home = home::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        Self {
            traces_dir: home.join(DEFAULT_TRACES_DIR),
            history_file: home.join(".histfile"),
            shell: "zsh".to_string(),
            capacity: crate::keeper::DEFAULT_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// Buffer capacity with the environment override applied.
    ///
    /// An invalid or non-positive override is ignored, keeping the
    /// configured value.
    pub fn effective_capacity(&self) -> usize {
        capacity_override(env::var(CAPACITY_ENV_VAR).ok().as_deref()).unwrap_or(self.capacity)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::config_validation("capacity", "must be positive"));
        }

        match self.shell.as_str() {
            "zsh" | "bash" => {}
            _ => {
                return Err(Error::config_validation(
                    "shell",
                    "must be one of: zsh, bash",
                ));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config_validation(
                    "log_level",
                    "must be one of: trace, debug, info, warn, error",
                ));
            }
        }

        Ok(())
    }
}

/// Parse a raw capacity override, rejecting non-numeric and non-positive
/// values.
fn capacity_override(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.parse::<usize>().ok())
        .filter(|&capacity| capacity > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shell, "zsh");
        assert_eq!(config.capacity, crate::keeper::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_capacity_override_accepts_positive_integers() {
        assert_eq!(capacity_override(Some("1000")), Some(1000));
        assert_eq!(capacity_override(Some("1")), Some(1));
    }

    #[test]
    fn test_capacity_override_ignores_invalid_values() {
        assert_eq!(capacity_override(Some("0")), None);
        assert_eq!(capacity_override(Some("-5")), None);
        assert_eq!(capacity_override(Some("lots")), None);
        assert_eq!(capacity_override(Some("")), None);
        assert_eq!(capacity_override(None), None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.capacity = 123;
        config.shell = "bash".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.capacity, 123);
        assert_eq!(loaded.shell, "bash");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.shell, "zsh");
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let mut config = Config::default();
        config.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_shell() {
        let mut config = Config::default();
        config.shell = "fish".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
