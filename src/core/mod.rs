//! core
//!
//! Domain types and configuration for the voter ledger.
//!
//! # Modules
//!
//! - [`record`] - Voter record schema and its stored form
//! - [`dataset`] - The fixed voter roll written by the seed operation
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod dataset;
pub mod record;
