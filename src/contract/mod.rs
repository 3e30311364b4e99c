//! contract
//!
//! The voting ledger's operations and their dispatch surface.
//!
//! # Operations
//!
//! | function        | args        | effect                                      |
//! |-----------------|-------------|---------------------------------------------|
//! | `initLedger`    | none        | write the fixed ten-voter roll              |
//! | `queryVoter`    | key         | return the raw stored record (or nothing)   |
//! | `queryAllVotes` | none        | return every record in the roll as JSON     |
//! | `doVoting`      | key, value  | cast a vote, at most once per record        |
//!
//! # Statelessness
//!
//! A [`VotingContract`] holds only its store handle and settings. Every
//! operation rebuilds what it needs from the store, so any number of
//! contracts may share one store.
//!
//! # Single Vote
//!
//! `doVoting` reads the record, checks it is unvoted, and writes it back
//! with [`KvStore::put_cas`] against the exact bytes it read. A concurrent
//! writer makes the swap fail, and the call reports the record as already
//! voted. No retry is attempted.
//!
//! # Example
//!
//! ```
//! use voter_ledger::contract::{LedgerError, VotingContract};
//! use voter_ledger::store::MemoryStore;
//!
//! let contract = VotingContract::new(MemoryStore::new());
//! contract.invoke("initLedger", &[]).unwrap();
//!
//! let args = ["VOTER0".to_string(), "CANDIDATE_A".to_string()];
//! contract.invoke("doVoting", &args).unwrap();
//! assert!(matches!(
//!     contract.invoke("doVoting", &args),
//!     Err(LedgerError::AlreadyVoted { .. })
//! ));
//! ```

mod error;
mod ops;
mod tally;

pub use error::LedgerError;
pub use ops::{ScanRow, SCAN_END, SCAN_START};
pub use tally::Tally;

use std::fmt;
use std::str::FromStr;

use crate::core::config::SeedPolicy;
use crate::store::KvStore;
use crate::ui::output::{self, Verbosity};

/// Functions recognized by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// `queryVoter`
    QueryVoter,
    /// `initLedger`
    InitLedger,
    /// `queryAllVotes`
    QueryAllVotes,
    /// `doVoting`
    DoVoting,
}

impl Function {
    /// All recognized functions.
    pub const ALL: [Function; 4] = [
        Function::QueryVoter,
        Function::InitLedger,
        Function::QueryAllVotes,
        Function::DoVoting,
    ];

    /// Wire name of the function.
    pub fn name(&self) -> &'static str {
        match self {
            Function::QueryVoter => "queryVoter",
            Function::InitLedger => "initLedger",
            Function::QueryAllVotes => "queryAllVotes",
            Function::DoVoting => "doVoting",
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Function::QueryVoter => 1,
            Function::InitLedger | Function::QueryAllVotes => 0,
            Function::DoVoting => 2,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| LedgerError::UnknownOperation(s.to_string()))
    }
}

/// Host-facing result envelope.
///
/// Status follows the peer response convention: `200` for success and
/// `500` for any error, with the error text in `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// `Response::OK` or `Response::ERROR`
    pub status: u16,
    /// Error description; empty on success
    pub message: String,
    /// Operation output; empty on error
    pub payload: Vec<u8>,
}

impl Response {
    /// Success status.
    pub const OK: u16 = 200;
    /// Error status.
    pub const ERROR: u16 = 500;

    /// A successful response carrying `payload`.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload,
        }
    }

    /// A failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Check whether the response is a success.
    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }
}

impl From<Result<Vec<u8>, LedgerError>> for Response {
    fn from(result: Result<Vec<u8>, LedgerError>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(e) => Response::error(e.to_string()),
        }
    }
}

/// The voting ledger over a key-value store.
#[derive(Debug, Clone)]
pub struct VotingContract<S> {
    store: S,
    seed_policy: SeedPolicy,
    verbosity: Verbosity,
}

impl<S: KvStore> VotingContract<S> {
    /// Create a contract over `store` with the default seed policy and no
    /// output.
    pub fn new(store: S) -> Self {
        Self {
            store,
            seed_policy: SeedPolicy::default(),
            verbosity: Verbosity::Quiet,
        }
    }

    /// Set the seed policy.
    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    /// Set the output verbosity for operation logging.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configured seed policy.
    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed_policy
    }

    /// Instantiation hook. Touches no state and always succeeds.
    pub fn init(&self) -> Response {
        Response::success(Vec::new())
    }

    /// Dispatch `function` with `args`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnknownOperation`] for an unrecognized name
    /// - whatever the selected operation returns
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        let function: Function = function.parse()?;
        output::debug(
            format!("invoke {} with {} argument(s)", function, args.len()),
            self.verbosity,
        );

        match function {
            Function::QueryVoter => self.query_voter(args),
            Function::InitLedger => self.init_ledger(args),
            Function::QueryAllVotes => self.query_all_votes(args),
            Function::DoVoting => self.do_voting(args),
        }
    }

    /// Dispatch and wrap the outcome in a [`Response`].
    pub fn handle(&self, function: &str, args: &[String]) -> Response {
        self.invoke(function, args).into()
    }
}

/// Fail with [`LedgerError::ArgumentCount`] unless `args` fits `function`.
fn expect_args(function: Function, args: &[String]) -> Result<(), LedgerError> {
    if args.len() != function.arity() {
        return Err(LedgerError::ArgumentCount {
            function,
            expected: function.arity(),
            actual: args.len(),
        });
    }
    Ok(())
}
