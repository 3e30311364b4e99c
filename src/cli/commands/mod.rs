//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the configured store through [`Context`]
//! 2. Runs one ledger operation
//! 3. Formats and displays output
//!
//! Operation payloads go to stdout. Errors bubble up to `main`, which
//! prints them and exits non-zero.

mod completion;
mod config_cmd;
mod ledger;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{list as config_list, path as config_path};
pub use ledger::{init, invoke, query, query_all, tally, vote};

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init => init(ctx),
        Command::Query { key } => query(ctx, &key),
        Command::QueryAll { pretty } => query_all(ctx, pretty),
        Command::Vote { key, value } => vote(ctx, &key, &value),
        Command::Invoke { function, args } => invoke(ctx, &function, &args),
        Command::Tally => tally(ctx),
        Command::Config { action } => match action {
            ConfigAction::List => config_list(ctx),
            ConfigAction::Path => config_path(ctx),
        },
        Command::Completion { shell } => completion(shell),
    }
}
