//! voter-ledger - A single-vote voter record ledger
//!
//! The ledger keeps a fixed roll of voter records in a key-value store and
//! lets each voter cast exactly one vote. It exposes four named operations:
//! seeding the roll, querying one record, listing the whole roll, and
//! casting a vote.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, opens the store)
//! - [`contract`] - The ledger operations and their dispatch
//! - [`core`] - Record schema, seed roll, and configuration
//! - [`store`] - Key-value store abstraction with range scans and CAS writes
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. A record's vote changes at most once, from `SINVOTAR` to a cast value
//! 2. Failed operations leave the store untouched (the seed operation may
//!    leave earlier records written)
//! 3. Every range scan is released, whether it completes or fails

pub mod cli;
pub mod contract;
pub mod core;
pub mod store;
pub mod ui;
