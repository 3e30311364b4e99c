//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [store]
//! provider = "file"
//! path = "/var/lib/vledger/ledger.toml"
//!
//! [seed]
//! policy = "once"
//! ```
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the store provider
//! must be one the crate knows how to create).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::store::VALID_PROVIDERS;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Store backend settings
    pub store: Option<StoreConfig>,

    /// Seed operation settings
    pub seed: Option<SeedConfig>,
}

impl LedgerConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(store) = &self.store {
            store.validate()?;
        }
        Ok(())
    }
}

/// Store backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Provider to use ("file" or "memory")
    pub provider: Option<String>,

    /// Data file for the file provider
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Validate the store configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !VALID_PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid store provider '{}', must be one of: {}",
                    provider,
                    VALID_PROVIDERS.join(", ")
                )));
            }
        }

        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "store path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Seed operation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// What seeding does when the roll already exists
    pub policy: Option<SeedPolicy>,
}

/// What the seed operation does when seed keys already exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedPolicy {
    /// Rewrite the roll unconditionally, clearing any cast votes.
    #[default]
    Reset,
    /// Seed only an empty roll; refuse if any seed key exists.
    Once,
}

impl SeedPolicy {
    /// Policy name as written in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPolicy::Reset => "reset",
            SeedPolicy::Once => "once",
        }
    }
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(SeedPolicy::Reset),
            "once" => Ok(SeedPolicy::Once),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid seed policy '{}', must be one of: reset, once",
                other
            ))),
        }
    }
}
