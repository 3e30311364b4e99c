//! Integration tests for the ledger operations.
//!
//! These tests drive the public dispatch surface against both store
//! backends, including concurrent voters sharing one store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tempfile::TempDir;

use voter_ledger::contract::{LedgerError, Response, VotingContract};
use voter_ledger::core::config::SeedPolicy;
use voter_ledger::core::record::{VoterRecord, UNVOTED};
use voter_ledger::store::{FailOn, FileStore, KvStore, MemoryStore, StoreError};

// =============================================================================
// Test Fixtures
// =============================================================================

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn seeded_memory() -> (MemoryStore, VotingContract<MemoryStore>) {
    let store = MemoryStore::new();
    let contract = VotingContract::new(store.clone());
    contract.invoke("initLedger", &[]).expect("seed");
    (store, contract)
}

/// A file-backed ledger in a scratch directory.
struct TestLedger {
    _dir: TempDir,
    path: std::path::PathBuf,
}

impl TestLedger {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("ledger.toml");
        Self { _dir: dir, path }
    }

    fn contract(&self) -> VotingContract<FileStore> {
        VotingContract::new(FileStore::with_path(self.path.clone()))
    }
}

fn query(contract: &VotingContract<impl KvStore>, key: &str) -> VoterRecord {
    let payload = contract
        .invoke("queryVoter", &args(&[key]))
        .expect("query");
    VoterRecord::from_bytes(&payload).expect("decode")
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn seed_then_scan_lists_ten_unvoted() {
    let (_store, contract) = seeded_memory();

    let payload = contract.invoke("queryAllVotes", &[]).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&payload).unwrap();

    let keys: Vec<&str> = rows.iter().map(|r| r["Key"].as_str().unwrap()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("VOTER{}", i)).collect();
    assert_eq!(keys, expected);
    assert!(rows.iter().all(|r| r["Record"]["vote"] == UNVOTED));
}

#[test]
fn seed_vote_query() {
    let (_store, contract) = seeded_memory();

    contract
        .invoke("doVoting", &args(&["VOTER0", "CANDIDATE_A"]))
        .unwrap();

    let record = query(&contract, "VOTER0");
    assert_eq!(record.vote, "CANDIDATE_A");
    assert_eq!(record.owner_id, "12345");
    assert_eq!(record.owner_desc, "Homero Simpson");
}

#[test]
fn second_vote_rejected_and_value_kept() {
    let (store, contract) = seeded_memory();

    contract
        .invoke("doVoting", &args(&["VOTER3", "A"]))
        .unwrap();
    let before = store.get("VOTER3").unwrap();

    let response = contract.handle("doVoting", &args(&["VOTER3", "B"]));
    assert_eq!(response.status, Response::ERROR);
    assert!(response.message.contains("only vote once"));
    assert_eq!(store.get("VOTER3").unwrap(), before);
}

#[test]
fn query_never_written_key_is_empty() {
    let (_store, contract) = seeded_memory();

    let response = contract.handle("queryVoter", &args(&["VOTER500"]));
    assert!(response.is_success());
    assert!(response.payload.is_empty());
}

#[test]
fn wrong_argument_counts_do_not_mutate() {
    let (store, contract) = seeded_memory();
    let snapshot = store.snapshot();
    let writes = store.write_count();

    let cases: [(&str, Vec<String>); 4] = [
        ("queryVoter", args(&[])),
        ("doVoting", args(&["VOTER0"])),
        ("initLedger", args(&["x"])),
        ("queryAllVotes", args(&["x", "y"])),
    ];
    for (function, bad) in cases {
        let result = contract.invoke(function, &bad);
        assert!(
            matches!(result, Err(LedgerError::ArgumentCount { .. })),
            "{} with {:?}",
            function,
            bad
        );
    }

    assert_eq!(store.snapshot(), snapshot);
    assert_eq!(store.write_count(), writes);
}

#[test]
fn unknown_function() {
    let (store, contract) = seeded_memory();
    let writes = store.write_count();

    let response = contract.handle("bogus", &args(&["VOTER0"]));
    assert_eq!(response.status, Response::ERROR);
    assert!(matches!(
        contract.invoke("bogus", &[]),
        Err(LedgerError::UnknownOperation(_))
    ));
    assert_eq!(store.write_count(), writes);
}

#[test]
fn vote_on_missing_key_is_not_found() {
    let (_store, contract) = seeded_memory();

    let result = contract.invoke("doVoting", &args(&["VOTER77", "A"]));
    assert!(matches!(result, Err(LedgerError::RecordNotFound { .. })));
}

#[test]
fn scan_with_extra_record_is_valid_json() {
    let (store, contract) = seeded_memory();
    let quoted = VoterRecord::unvoted("PIN", "1", "\"quoted\"", "back\\slash")
        .to_bytes()
        .unwrap();
    store.put("VOTER10", &quoted).unwrap();

    let payload = contract.invoke("queryAllVotes", &[]).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&payload).unwrap();
    assert_eq!(rows.len(), 11);
    // "VOTER10" sorts between "VOTER1" and "VOTER2"
    assert_eq!(rows[2]["Key"], "VOTER10");
    assert_eq!(rows[2]["Record"]["ownerid"], "\"quoted\"");
}

#[test]
fn scan_released_on_success_and_failure() {
    let (store, contract) = seeded_memory();

    contract.invoke("queryAllVotes", &[]).unwrap();
    assert_eq!(store.open_scans(), 0);

    let store = store.fail_on(FailOn::ScanEntry { index: 5 });
    assert!(contract.invoke("queryAllVotes", &[]).is_err());
    assert_eq!(store.open_scans(), 0);
}

#[test]
fn seed_once_policy() {
    let store = MemoryStore::new();
    let contract = VotingContract::new(store.clone()).with_seed_policy(SeedPolicy::Once);

    contract.invoke("initLedger", &[]).unwrap();
    contract
        .invoke("doVoting", &args(&["VOTER1", "A"]))
        .unwrap();

    let result = contract.invoke("initLedger", &[]);
    assert!(matches!(result, Err(LedgerError::AlreadySeeded { .. })));
    assert_eq!(query(&contract, "VOTER1").vote, "A");
}

#[test]
fn seed_partial_failure_keeps_written_records() {
    let store = MemoryStore::new().fail_on(FailOn::Put { after: 6 });
    let contract = VotingContract::new(store.clone());

    let result = contract.invoke("initLedger", &[]);
    assert!(matches!(
        result,
        Err(LedgerError::Store(StoreError::WriteError(_)))
    ));

    store.clear_fail_on();
    let payload = contract.invoke("queryAllVotes", &[]).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&payload).unwrap();
    assert_eq!(rows.len(), 6);
}

#[test]
fn concurrent_votes_on_one_key_memory() {
    let (store, contract) = seeded_memory();
    let accepted = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    thread::scope(|s| {
        for i in 0..8 {
            let contract = &contract;
            let accepted = &accepted;
            let rejected = &rejected;
            s.spawn(move || {
                let value = format!("CANDIDATE_{}", i);
                match contract.invoke("doVoting", &args(&["VOTER4", value.as_str()])) {
                    Ok(_) => accepted.fetch_add(1, Ordering::SeqCst),
                    Err(LedgerError::AlreadyVoted { .. }) => rejected.fetch_add(1, Ordering::SeqCst),
                    Err(e) => panic!("unexpected error: {}", e),
                };
            });
        }
    });

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(rejected.load(Ordering::SeqCst), 7);

    let record = VoterRecord::from_bytes(&store.get("VOTER4").unwrap().unwrap()).unwrap();
    assert!(record.vote.starts_with("CANDIDATE_"));
}

// =============================================================================
// File store
// =============================================================================

#[test]
fn file_ledger_persists_between_instances() {
    let ledger = TestLedger::new();

    ledger.contract().invoke("initLedger", &[]).unwrap();
    ledger
        .contract()
        .invoke("doVoting", &args(&["VOTER9", "CANDIDATE_B"]))
        .unwrap();

    let record = query(&ledger.contract(), "VOTER9");
    assert_eq!(record.vote, "CANDIDATE_B");
    assert_eq!(record.owner_desc, "Roberto Gomez");

    let result = ledger
        .contract()
        .invoke("doVoting", &args(&["VOTER9", "CANDIDATE_A"]));
    assert!(matches!(result, Err(LedgerError::AlreadyVoted { .. })));
}

#[test]
fn file_ledger_tally() {
    let ledger = TestLedger::new();
    let contract = ledger.contract();

    contract.invoke("initLedger", &[]).unwrap();
    for (key, value) in [("VOTER0", "A"), ("VOTER1", "A"), ("VOTER2", "B")] {
        contract.invoke("doVoting", &args(&[key, value])).unwrap();
    }

    let tally = contract.tally().unwrap();
    assert_eq!(tally.counts.get("A"), Some(&2));
    assert_eq!(tally.counts.get("B"), Some(&1));
    assert_eq!(tally.unvoted, 7);
}

#[test]
fn concurrent_votes_on_one_key_file() {
    let ledger = TestLedger::new();
    ledger.contract().invoke("initLedger", &[]).unwrap();
    let accepted = AtomicUsize::new(0);

    thread::scope(|s| {
        for i in 0..4 {
            let ledger = &ledger;
            let accepted = &accepted;
            s.spawn(move || {
                // Each thread opens its own store, as separate processes would
                let contract = ledger.contract();
                let value = format!("V{}", i);
                if contract
                    .invoke("doVoting", &args(&["VOTER6", value.as_str()]))
                    .is_ok()
                {
                    accepted.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert!(query(&ledger.contract(), "VOTER6").has_voted());
}
