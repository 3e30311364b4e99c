//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$VLEDGER_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/vledger/config.toml`
//! 3. `~/.vledger/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use voter_ledger::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Store provider: {}", config.store_provider());
//! println!("Seed policy: {}", config.seed_policy());
//! ```

pub mod schema;

pub use schema::{LedgerConfig, SeedConfig, SeedPolicy, StoreConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::DEFAULT_PROVIDER;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VLEDGER_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessor methods apply defaults for anything the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed configuration file contents
    pub file: LedgerConfig,
    /// Path the configuration was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation. A missing config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::discover() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Find the first existing config file in the standard locations.
    pub fn discover() -> Option<PathBuf> {
        // 1. Check $VLEDGER_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/vledger/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("vledger/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.vledger/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".vledger/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read, parse, and validate a specific config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: LedgerConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Get the canonical config file location.
    ///
    /// Returns `~/.vledger/config.toml`.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".vledger/config.toml"))
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the store provider.
    ///
    /// Defaults to "file" if not configured.
    pub fn store_provider(&self) -> &str {
        self.file
            .store
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    /// Get the configured store data file.
    ///
    /// Returns `None` if not configured (the provider picks its default).
    pub fn store_path(&self) -> Option<&Path> {
        self.file.store.as_ref().and_then(|s| s.path.as_deref())
    }

    /// Get the seed policy.
    ///
    /// Defaults to [`SeedPolicy::Reset`] if not configured.
    pub fn seed_policy(&self) -> SeedPolicy {
        self.file
            .seed
            .as_ref()
            .and_then(|s| s.policy)
            .unwrap_or_default()
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();

        assert_eq!(config.store_provider(), "file");
        assert!(config.store_path().is_none());
        assert_eq!(config.seed_policy(), SeedPolicy::Reset);
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            [store]
            provider = "file"
            path = "/srv/ledger.toml"

            [seed]
            policy = "once"
            "#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert_eq!(config.store_provider(), "file");
        assert_eq!(config.store_path(), Some(Path::new("/srv/ledger.toml")));
        assert_eq!(config.seed_policy(), SeedPolicy::Once);
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[seed]\npolicy = \"once\"\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.store_provider(), "file");
        assert_eq!(config.seed_policy(), SeedPolicy::Once);
    }

    #[test]
    fn invalid_provider_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[store]\nprovider = \"cloud\"\n").unwrap();

        let result = Config::from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[store\nprovider = ").unwrap();

        let result = Config::from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::from_file(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
