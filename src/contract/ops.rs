//! contract::ops
//!
//! The four ledger operations.

use serde::Serialize;

use super::{expect_args, Function, LedgerError, VotingContract};
use crate::core::config::SeedPolicy;
use crate::core::dataset;
use crate::core::record::{RecordFormatError, VoterRecord, UNVOTED};
use crate::store::{KvStore, StoreError};
use crate::ui::output;

/// First key of the full scan (inclusive).
pub const SCAN_START: &str = "VOTER0";

/// Scan end bound (exclusive).
pub const SCAN_END: &str = "VOTER999";

/// One element of the `queryAllVotes` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRow {
    /// Store key
    #[serde(rename = "Key")]
    pub key: String,

    /// Decoded record
    #[serde(rename = "Record")]
    pub record: VoterRecord,
}

impl<S: KvStore> VotingContract<S> {
    /// `initLedger`: write the fixed voter roll.
    ///
    /// Records already written stay written if a later write fails.
    ///
    /// Under [`SeedPolicy::Once`] the existence check and the per-key
    /// create-only writes are separate steps. A concurrent seeder that wins
    /// a key after the check makes this call fail with
    /// [`LedgerError::AlreadySeeded`], and the keys this call created before
    /// that point stay written.
    pub fn init_ledger(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        expect_args(Function::InitLedger, args)?;

        if self.seed_policy == SeedPolicy::Once {
            for key in dataset::seed_keys() {
                if self.store.contains(&key)? {
                    return Err(LedgerError::AlreadySeeded { key });
                }
            }
        }

        for (key, record) in dataset::seed_records() {
            let bytes = record.to_bytes().map_err(|source| LedgerError::RecordFormat {
                key: key.clone(),
                source,
            })?;

            match self.seed_policy {
                SeedPolicy::Reset => self.store.put(&key, &bytes)?,
                SeedPolicy::Once => match self.store.put_cas(&key, None, &bytes) {
                    Ok(()) => {}
                    Err(StoreError::CasFailed { key }) => {
                        return Err(LedgerError::AlreadySeeded { key })
                    }
                    Err(e) => return Err(e.into()),
                },
            }

            output::debug(
                format!("seeded {} ({})", key, record.owner_desc),
                self.verbosity,
            );
        }

        Ok(Vec::new())
    }

    /// `queryVoter`: return the raw bytes stored at the key.
    ///
    /// A missing key yields an empty payload, not an error.
    pub fn query_voter(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        expect_args(Function::QueryVoter, args)?;
        Ok(self.store.get(&args[0])?.unwrap_or_default())
    }

    /// `queryAllVotes`: every record in the roll as a JSON array of
    /// `{"Key": ..., "Record": {...}}` objects, in key order.
    pub fn query_all_votes(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        expect_args(Function::QueryAllVotes, args)?;

        let rows = self.scan_rows()?;
        let payload = serde_json::to_vec(&rows).map_err(|e| LedgerError::RecordFormat {
            key: format!("{}..{}", SCAN_START, SCAN_END),
            source: RecordFormatError::Encode(e.to_string()),
        })?;

        output::debug(
            format!("queryAllVotes:\n{}", String::from_utf8_lossy(&payload)),
            self.verbosity,
        );
        Ok(payload)
    }

    /// `doVoting`: cast `args[1]` as the vote of the record at `args[0]`.
    pub fn do_voting(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        expect_args(Function::DoVoting, args)?;
        let (key, value) = (&args[0], &args[1]);

        if value == UNVOTED {
            return Err(LedgerError::InvalidVote {
                key: key.clone(),
                value: value.clone(),
            });
        }

        let current = self
            .store
            .get(key)?
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| LedgerError::RecordNotFound { key: key.clone() })?;

        let mut record =
            VoterRecord::from_bytes(&current).map_err(|source| LedgerError::RecordFormat {
                key: key.clone(),
                source,
            })?;

        if !record.cast(value.as_str()) {
            return Err(LedgerError::AlreadyVoted { key: key.clone() });
        }

        let updated = record.to_bytes().map_err(|source| LedgerError::RecordFormat {
            key: key.clone(),
            source,
        })?;

        match self.store.put_cas(key, Some(&current), &updated) {
            Ok(()) => {
                output::debug(format!("vote accepted for {}", key), self.verbosity);
                Ok(Vec::new())
            }
            Err(StoreError::CasFailed { .. }) => {
                output::debug(
                    format!("{} changed while voting; rejecting", key),
                    self.verbosity,
                );
                Err(LedgerError::AlreadyVoted { key: key.clone() })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drain the roll's range scan into decoded rows.
    ///
    /// The scan is released on every path out of this function.
    pub(super) fn scan_rows(&self) -> Result<Vec<ScanRow>, LedgerError> {
        let mut scan = self.store.scan(SCAN_START, SCAN_END)?;

        let mut rows = Vec::new();
        for entry in &mut scan {
            let (key, value) = entry?;
            let record = VoterRecord::from_bytes(&value).map_err(|source| {
                LedgerError::RecordFormat {
                    key: key.clone(),
                    source,
                }
            })?;
            rows.push(ScanRow { key, record });
        }
        scan.close();

        Ok(rows)
    }
}
