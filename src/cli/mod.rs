//! cli
//!
//! Command-line interface for the voter ledger.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration and open the store
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It builds a [`Context`] from flags and config,
//! and every ledger command runs through [`crate::contract::VotingContract`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::contract::VotingContract;
use crate::core::config::Config;
use crate::store::{self, FileStore, KvStore};
use crate::ui::output::{self, Verbosity};

/// Per-invocation settings shared by command handlers.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Store path from `--store`
    pub store: Option<PathBuf>,
    /// Debug output enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
}

impl Context {
    /// Output verbosity for these flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Load configuration from the standard locations.
    pub fn config(&self) -> Result<Config> {
        Config::load().context("Failed to load config")
    }

    /// Effective ledger data file for the file provider.
    ///
    /// `--store` wins over the config file, which wins over the default.
    pub fn store_path(&self, config: &Config) -> Result<PathBuf> {
        if let Some(path) = &self.store {
            return Ok(path.clone());
        }
        if let Some(path) = config.store_path() {
            return Ok(path.to_path_buf());
        }
        FileStore::default_path().context("Failed to resolve default store path")
    }

    /// Open the configured store and wrap it in a contract.
    pub fn open_contract(&self) -> Result<VotingContract<Box<dyn KvStore>>> {
        let config = self.config()?;
        let provider = config.store_provider();
        let verbosity = self.verbosity();
        let path = match provider {
            "file" => Some(self.store_path(&config)?),
            _ => {
                if self.store.is_some() {
                    output::warn(
                        format!("--store ignored by the {} store provider", provider),
                        verbosity,
                    );
                }
                output::warn(
                    "memory store does not persist between invocations",
                    verbosity,
                );
                None
            }
        };

        output::debug(
            format!(
                "store provider {} at {}",
                provider,
                path.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(memory)".to_string())
            ),
            verbosity,
        );

        let store = store::create_store(provider, path).context("Failed to open store")?;
        Ok(VotingContract::new(store)
            .with_seed_policy(config.seed_policy())
            .with_verbosity(verbosity))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        store: cli.store.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
