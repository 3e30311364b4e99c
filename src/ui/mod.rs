//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Library code never prints directly. Everything user-visible goes
//! through [`output`] with an explicit [`output::Verbosity`].

pub mod output;
