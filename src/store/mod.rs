//! store
//!
//! Key-value store abstraction the ledger runs on.
//!
//! # Architecture
//!
//! Records are stored through the [`KvStore`] trait, which has
//! multiple implementations:
//!
//! - [`MemoryStore`]: `BTreeMap` behind a mutex (tests, embedding)
//! - [`FileStore`]: TOML file guarded by an OS file lock (default for the CLI)
//!
//! Both implementations make `put_cas` atomic, which is what the vote
//! casting operation relies on to keep a record from being voted twice.
//!
//! # Provider Selection
//!
//! Use [`create_store`] to create a store based on configuration:
//!
//! ```
//! use voter_ledger::store::create_store;
//!
//! let store = create_store("memory", None).unwrap();
//! assert!(store.get("VOTER0").unwrap().is_none());
//! ```

mod file_store;
pub mod lock;
mod memory;
mod traits;

use std::path::PathBuf;

pub use file_store::FileStore;
pub use memory::{FailOn, MemoryStore};
pub use traits::{KvStore, RangeScan, ScanEntry, StoreError};

/// Valid store provider names.
pub const VALID_PROVIDERS: &[&str] = &["file", "memory"];

/// The default store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Create a store based on the provider name.
///
/// # Providers
///
/// - `"file"` (default): [`FileStore`] at `path`, or `~/.vledger/ledger.toml`
/// - `"memory"`: [`MemoryStore`]; `path` is ignored and nothing persists
///
/// # Errors
///
/// - Unknown provider name
/// - Home directory lookup failure for the default file location
pub fn create_store(
    provider: &str,
    path: Option<PathBuf>,
) -> Result<Box<dyn KvStore>, StoreError> {
    match provider {
        "file" => match path {
            Some(path) => Ok(Box::new(FileStore::with_path(path))),
            None => Ok(Box::new(FileStore::new()?)),
        },
        "memory" => Ok(Box::new(MemoryStore::new())),
        other => Err(StoreError::ProviderNotAvailable(format!(
            "unknown store provider: '{}' (valid: {})",
            other,
            VALID_PROVIDERS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_memory_store() {
        let store = create_store("memory", None).expect("create memory store");
        assert!(store.get("nonexistent").expect("get").is_none());
    }

    #[test]
    fn create_file_store_at_path() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("ledger.toml");

        let store = create_store("file", Some(path.clone())).expect("create file store");
        store.put("key", b"value").expect("put");
        assert!(path.exists());
    }

    #[test]
    fn create_unknown_provider() {
        let result = create_store("unknown", None);
        match result {
            Err(StoreError::ProviderNotAvailable(msg)) => {
                assert!(msg.contains("unknown"));
                assert!(msg.contains("memory"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn default_provider_is_valid() {
        assert!(VALID_PROVIDERS.contains(&DEFAULT_PROVIDER));
    }
}
