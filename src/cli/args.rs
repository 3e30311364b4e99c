//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--store <path>`: Use this ledger data file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vledger - A single-vote voter record ledger
#[derive(Parser, Debug)]
#[command(name = "vledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ledger data file (overrides the configured store path)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the fixed voter roll (VOTER0..VOTER9)
    #[command(long_about = "Write the fixed voter roll (VOTER0..VOTER9).\n\n\
        With the default `reset` seed policy this rewrites every seed record and \
        clears any votes already cast on them. With `[seed] policy = \"once\"` \
        the command refuses to run against a roll that already exists.")]
    Init,

    /// Print the stored record for a key
    Query {
        /// Record key (e.g. VOTER0)
        key: String,
    },

    /// Print every record in the roll as JSON
    QueryAll {
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Cast a vote for a voter (once per voter)
    Vote {
        /// Record key (e.g. VOTER0)
        key: String,
        /// Vote value to record
        value: String,
    },

    /// Invoke a ledger function by name with raw arguments
    #[command(after_help = "\
FUNCTIONS:
    initLedger                 (no arguments)
    queryVoter <KEY>
    queryAllVotes              (no arguments)
    doVoting <KEY> <VALUE>")]
    Invoke {
        /// Function name
        function: String,
        /// Function arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Count votes by value
    Tally,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts.\n\n\
        Output the completion script to stdout. Source it in your shell's \
        configuration to enable tab completion.\n\n\
        EXAMPLES:\n\
        # Bash\n\
        vledger completion bash > ~/.local/share/bash-completion/completions/vledger\n\n\
        # Zsh\n\
        vledger completion zsh > ~/.zfunc/_vledger\n\n\
        # Fish\n\
        vledger completion fish > ~/.config/fish/completions/vledger.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// List effective configuration values
    List,
    /// Print the config file and ledger data file locations
    Path,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
