//! core::record
//!
//! Voter record schema.
//!
//! # Wire Format
//!
//! A record is stored as a compact JSON object with five string fields:
//!
//! ```json
//! {"security":"PIN","factor":"100","vote":"SINVOTAR","ownerid":"12345","ownerdesc":"Homero Simpson"}
//! ```
//!
//! Missing fields read back as empty strings and unknown fields are
//! ignored. Anything that is not a JSON object with string values is a
//! [`RecordFormatError`].
//!
//! # Vote State
//!
//! `vote == UNVOTED` means the voter has not voted. Any other value is a
//! final vote: [`VoterRecord::cast`] refuses to change it.
//!
//! # Example
//!
//! ```
//! use voter_ledger::core::record::{VoterRecord, UNVOTED};
//!
//! let mut record = VoterRecord::unvoted("PIN", "100", "12345", "Homero Simpson");
//! assert_eq!(record.vote, UNVOTED);
//!
//! assert!(record.cast("CANDIDATE_A"));
//! assert!(!record.cast("CANDIDATE_B"));
//! assert_eq!(record.vote, "CANDIDATE_A");
//!
//! let bytes = record.to_bytes().unwrap();
//! assert_eq!(VoterRecord::from_bytes(&bytes).unwrap(), record);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Vote value marking a record that has not voted yet.
pub const UNVOTED: &str = "SINVOTAR";

/// Prefix shared by every voter key.
pub const KEY_PREFIX: &str = "VOTER";

/// Store key for the voter at `index`.
///
/// # Example
///
/// ```
/// use voter_ledger::core::record::voter_key;
///
/// assert_eq!(voter_key(0), "VOTER0");
/// assert_eq!(voter_key(42), "VOTER42");
/// ```
pub fn voter_key(index: usize) -> String {
    format!("{}{}", KEY_PREFIX, index)
}

/// Stored bytes could not be read as a voter record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordFormatError {
    #[error("malformed voter record: {0}")]
    Malformed(String),

    #[error("failed to encode voter record: {0}")]
    Encode(String),
}

/// A voter entry in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoterRecord {
    /// Authentication factor label (e.g. "PIN")
    pub security: String,

    /// Opaque factor identifier, kept as text
    pub factor: String,

    /// Vote state: [`UNVOTED`] or the cast value
    pub vote: String,

    /// External owner identifier
    #[serde(rename = "ownerid")]
    pub owner_id: String,

    /// Human-readable owner label
    #[serde(rename = "ownerdesc")]
    pub owner_desc: String,
}

impl VoterRecord {
    /// Create a record that has not voted yet.
    pub fn unvoted(
        security: impl Into<String>,
        factor: impl Into<String>,
        owner_id: impl Into<String>,
        owner_desc: impl Into<String>,
    ) -> Self {
        Self {
            security: security.into(),
            factor: factor.into(),
            vote: UNVOTED.to_string(),
            owner_id: owner_id.into(),
            owner_desc: owner_desc.into(),
        }
    }

    /// Check whether a vote has been cast.
    pub fn has_voted(&self) -> bool {
        self.vote != UNVOTED
    }

    /// Cast `value` as this record's vote.
    ///
    /// Returns `false` and leaves the record untouched if a vote was
    /// already cast, or if `value` is [`UNVOTED`] (which would not be a
    /// transition).
    pub fn cast(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.has_voted() || value == UNVOTED {
            return false;
        }
        self.vote = value;
        true
    }

    /// Encode the record in its stored form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordFormatError> {
        serde_json::to_vec(self).map_err(|e| RecordFormatError::Encode(e.to_string()))
    }

    /// Decode a record from its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`RecordFormatError::Malformed`] if `bytes` is not a JSON
    /// object whose known fields are strings.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordFormatError> {
        // Derived `Deserialize` also accepts the sequence form of a struct
        let object: Map<String, Value> = serde_json::from_slice(bytes)
            .map_err(|e| RecordFormatError::Malformed(e.to_string()))?;
        serde_json::from_value(Value::Object(object))
            .map_err(|e| RecordFormatError::Malformed(e.to_string()))
    }
}
