//! config command - Show effective configuration

use crate::cli::Context;
use crate::core::config::Config;
use crate::store::DEFAULT_PROVIDER;
use anyhow::Result;

/// List effective configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    println!("store.provider = {}", config.store_provider());
    if config.store_provider() == DEFAULT_PROVIDER {
        println!("store.path = {}", ctx.store_path(&config)?.display());
    }
    println!("seed.policy = {}", config.seed_policy());

    Ok(())
}

/// Print the config file and ledger data file locations.
pub fn path(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    match config.loaded_from() {
        Some(path) => println!("config: {}", path.display()),
        None => println!(
            "config: {} (not present)",
            Config::default_config_path()?.display()
        ),
    }
    println!("store: {}", ctx.store_path(&config)?.display());

    Ok(())
}
