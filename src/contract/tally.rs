//! contract::tally
//!
//! Vote counts over the voter roll.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{LedgerError, VotingContract};
use crate::store::KvStore;

/// Counts of cast votes by value, plus the number of voters still unvoted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Cast votes per distinct value
    pub counts: BTreeMap<String, usize>,
    /// Voters who have not voted
    pub unvoted: usize,
}

impl Tally {
    /// Total number of votes cast.
    pub fn total_cast(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of voters in the roll.
    pub fn total_voters(&self) -> usize {
        self.total_cast() + self.unvoted
    }
}

impl<S: KvStore> VotingContract<S> {
    /// Count votes across the roll.
    ///
    /// Reads the same range as `queryAllVotes` and fails the same way on a
    /// malformed record.
    pub fn tally(&self) -> Result<Tally, LedgerError> {
        let mut tally = Tally::default();
        for row in self.scan_rows()? {
            if row.record.has_voted() {
                *tally.counts.entry(row.record.vote).or_default() += 1;
            } else {
                tally.unvoted += 1;
            }
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn vote(contract: &VotingContract<MemoryStore>, key: &str, value: &str) {
        contract
            .do_voting(&[key.to_string(), value.to_string()])
            .expect("vote");
    }

    #[test]
    fn fresh_roll_is_all_unvoted() {
        let contract = VotingContract::new(MemoryStore::new());
        contract.init_ledger(&[]).unwrap();

        let tally = contract.tally().unwrap();
        assert!(tally.counts.is_empty());
        assert_eq!(tally.unvoted, 10);
        assert_eq!(tally.total_voters(), 10);
    }

    #[test]
    fn counts_by_value() {
        let contract = VotingContract::new(MemoryStore::new());
        contract.init_ledger(&[]).unwrap();

        vote(&contract, "VOTER0", "A");
        vote(&contract, "VOTER3", "B");
        vote(&contract, "VOTER8", "A");

        let tally = contract.tally().unwrap();
        assert_eq!(tally.counts.get("A"), Some(&2));
        assert_eq!(tally.counts.get("B"), Some(&1));
        assert_eq!(tally.total_cast(), 3);
        assert_eq!(tally.unvoted, 7);
    }

    #[test]
    fn empty_store_tallies_nothing() {
        let contract = VotingContract::new(MemoryStore::new());
        assert_eq!(contract.tally().unwrap(), Tally::default());
    }

    #[test]
    fn malformed_record_fails_tally() {
        let store = MemoryStore::with_entries([("VOTER0", b"{".to_vec())]);
        let contract = VotingContract::new(store.clone());

        assert!(matches!(
            contract.tally(),
            Err(LedgerError::RecordFormat { .. })
        ));
        assert_eq!(store.open_scans(), 0);
    }
}
