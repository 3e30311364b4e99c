//! core::dataset
//!
//! The fixed voter roll written by the seed operation.

use super::record::{voter_key, VoterRecord};

/// `(security, factor, ownerid, ownerdesc)` for each seeded voter, by index.
const SEED_VOTERS: [(&str, &str, &str, &str); 10] = [
    ("PIN", "100", "12345", "Homero Simpson"),
    ("PIN", "120", "67890", "Peter Griffin"),
    ("PIN", "200", "654321", "Jhon Smith"),
    ("PIN", "1000", "098765", "Chaparron Bonaparte"),
    ("PIN", "50", "A23421", "Sun Wukong"),
    ("PIN", "80", "98765", "Seiya Shiryu"),
    ("PIN", "250", "765890", "Ned Flanders"),
    ("PIN", "40", "777888", "Carlos Donoso"),
    ("PIN", "5", "877899", "Ramon Valdes"),
    ("PIN", "500", "131313", "Roberto Gomez"),
];

/// Number of records in the seed roll.
pub const SEED_COUNT: usize = SEED_VOTERS.len();

/// The seed roll as `(key, record)` pairs, keys `VOTER0`..`VOTER9`.
pub fn seed_records() -> Vec<(String, VoterRecord)> {
    SEED_VOTERS
        .iter()
        .enumerate()
        .map(|(i, (security, factor, owner_id, owner_desc))| {
            (
                voter_key(i),
                VoterRecord::unvoted(*security, *factor, *owner_id, *owner_desc),
            )
        })
        .collect()
}

/// Keys written by the seed operation, in write order.
pub fn seed_keys() -> impl Iterator<Item = String> {
    (0..SEED_COUNT).map(voter_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_gapless_keys() {
        let keys: Vec<String> = seed_records().into_iter().map(|(k, _)| k).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("VOTER{}", i)).collect();
        assert_eq!(keys, expected);
        assert_eq!(seed_keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn every_seed_record_is_unvoted() {
        assert!(seed_records().iter().all(|(_, r)| !r.has_voted()));
        assert!(seed_records().iter().all(|(_, r)| r.security == "PIN"));
    }

    #[test]
    fn first_and_last_entries() {
        let records = seed_records();
        assert_eq!(records[0].1.owner_id, "12345");
        assert_eq!(records[0].1.owner_desc, "Homero Simpson");
        assert_eq!(records[3].1.owner_id, "098765");
        assert_eq!(records[9].1.factor, "500");
        assert_eq!(records[9].1.owner_desc, "Roberto Gomez");
    }
}
