//! contract::error
//!
//! Errors surfaced by ledger operations.

use thiserror::Error;

use super::Function;
use crate::core::record::RecordFormatError;
use crate::store::StoreError;

/// Errors from ledger operations.
///
/// Every error ends the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Wrong number of arguments for the function.
    #[error("incorrect number of arguments for {function}: expecting {expected}, got {actual}")]
    ArgumentCount {
        function: Function,
        expected: usize,
        actual: usize,
    },

    /// Function name not recognized by the dispatcher.
    #[error("invalid function name: '{0}'")]
    UnknownOperation(String),

    /// Stored bytes are not a valid voter record.
    #[error("bad record at {key}: {source}")]
    RecordFormat {
        key: String,
        #[source]
        source: RecordFormatError,
    },

    /// The record's vote was already cast.
    #[error("{key} already voted, a voter can only vote once")]
    AlreadyVoted { key: String },

    /// The vote value is the unvoted sentinel.
    #[error("cannot cast '{value}' as the vote for {key}: it marks an unvoted record")]
    InvalidVote { key: String, value: String },

    /// No record stored under the key.
    #[error("no voter record at {key}")]
    RecordNotFound { key: String },

    /// The seed roll already exists and the seed policy forbids rewriting it.
    #[error("ledger already seeded ({key} exists)")]
    AlreadySeeded { key: String },

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
