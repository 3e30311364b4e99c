//! store::traits
//!
//! Key-value store trait definition.
//!
//! # Design
//!
//! The `KvStore` trait is the only boundary the ledger operations see.
//! It offers point reads, point writes, a compare-and-swap write, and an
//! ordered range scan over string keys.
//!
//! # Range Scans
//!
//! A scan is a lazy, finite, non-restartable sequence wrapped in a
//! [`RangeScan`]. The scan may hold a store resource (for example a shared
//! file lock). That resource is released exactly once: by [`RangeScan::close`]
//! or, on any other exit path, when the scan is dropped.
//!
//! # Example
//!
//! ```
//! use voter_ledger::store::{KvStore, MemoryStore, StoreError};
//!
//! fn dump(store: &dyn KvStore) -> Result<Vec<String>, StoreError> {
//!     let mut keys = Vec::new();
//!     let mut scan = store.scan("VOTER0", "VOTER999")?;
//!     for entry in &mut scan {
//!         let (key, _value) = entry?;
//!         keys.push(key);
//!     }
//!     scan.close();
//!     Ok(keys)
//! }
//!
//! let store = MemoryStore::new();
//! store.put("VOTER1", b"{}").unwrap();
//! store.put("VOTER0", b"{}").unwrap();
//! assert_eq!(dump(&store).unwrap(), vec!["VOTER0", "VOTER1"]);
//! ```

use std::fmt;

use thiserror::Error;

/// Errors from key-value store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to read from the store.
    #[error("failed to read store: {0}")]
    ReadError(String),

    /// Failed to write to the store.
    #[error("failed to write store: {0}")]
    WriteError(String),

    /// CAS precondition failed - the value changed since it was read.
    #[error("CAS precondition failed for key: {key}")]
    CasFailed {
        /// The key whose value no longer matched
        key: String,
    },

    /// Failed to acquire or release a store lock.
    #[error("store lock error: {0}")]
    LockError(String),

    /// The store cannot hold the given value.
    #[error("invalid value for key {key}: {message}")]
    InvalidValue {
        /// The key being written
        key: String,
        /// Why the value was rejected
        message: String,
    },

    /// Provider not available or not configured.
    #[error("store provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// A single `(key, raw value)` pair yielded by a range scan.
pub type ScanEntry = (String, Vec<u8>);

type ScanIter<'a> = Box<dyn Iterator<Item = Result<ScanEntry, StoreError>> + Send + 'a>;
type Release<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Scoped range scan over a store.
///
/// Iterating yields entries in ascending key order. Once the underlying
/// sequence yields an error or runs out, the scan stays exhausted.
pub struct RangeScan<'a> {
    entries: ScanIter<'a>,
    release: Option<Release<'a>>,
    exhausted: bool,
}

impl<'a> RangeScan<'a> {
    /// Create a scan from an entry sequence and a release hook.
    ///
    /// `release` runs exactly once, on `close()` or drop.
    pub fn new<I, F>(entries: I, release: F) -> Self
    where
        I: Iterator<Item = Result<ScanEntry, StoreError>> + Send + 'a,
        F: FnOnce() + Send + 'a,
    {
        Self {
            entries: Box::new(entries),
            release: Some(Box::new(release)),
            exhausted: false,
        }
    }

    /// Check whether the scan still holds its resource.
    pub fn is_open(&self) -> bool {
        self.release.is_some()
    }

    /// Release the scan's resource.
    ///
    /// Safe to call more than once; only the first call has an effect.
    pub fn close(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
        self.exhausted = true;
    }
}

impl Iterator for RangeScan<'_> {
    type Item = Result<ScanEntry, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.entries.next() {
            Some(Ok(entry)) => Some(Ok(entry)),
            Some(Err(e)) => {
                self.exhausted = true;
                Some(Err(e))
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

impl Drop for RangeScan<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for RangeScan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeScan")
            .field("open", &self.is_open())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

/// Trait for key-value store providers.
///
/// Implementations must be thread-safe (Send + Sync). Keys are compared
/// as byte strings, so scans are lexicographic.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`, overwriting any existing value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Write `value` under `key` only if the current value equals `expected`.
    ///
    /// `expected = None` means the key must not exist.
    ///
    /// # Errors
    ///
    /// - [`StoreError::CasFailed`] if the current value differs
    fn put_cas(&self, key: &str, expected: Option<&[u8]>, value: &[u8])
        -> Result<(), StoreError>;

    /// Scan keys in `[start, end)` in ascending order.
    fn scan(&self, start: &str, end: &str) -> Result<RangeScan<'_>, StoreError>;

    /// Check if a key exists.
    ///
    /// Default implementation uses `get()` and checks for `Some`.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn put_cas(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<(), StoreError> {
        (**self).put_cas(key, expected, value)
    }

    fn scan(&self, start: &str, end: &str) -> Result<RangeScan<'_>, StoreError> {
        (**self).scan(start, end)
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        (**self).contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn entries(keys: &[&str]) -> Vec<Result<ScanEntry, StoreError>> {
        keys.iter()
            .map(|k| Ok((k.to_string(), b"{}".to_vec())))
            .collect()
    }

    #[test]
    fn error_display_formatting() {
        let err = StoreError::ReadError("disk full".into());
        assert!(err.to_string().contains("read"));

        let err = StoreError::WriteError("permission denied".into());
        assert!(err.to_string().contains("write"));

        let err = StoreError::CasFailed {
            key: "VOTER3".into(),
        };
        assert!(err.to_string().contains("CAS"));
        assert!(err.to_string().contains("VOTER3"));

        let err = StoreError::ProviderNotAvailable("redis".into());
        assert!(err.to_string().contains("provider"));
    }

    #[test]
    fn release_runs_once_on_close() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);

        let mut scan = RangeScan::new(entries(&["a"]).into_iter(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scan.is_open());

        scan.close();
        scan.close();
        assert!(!scan.is_open());
        drop(scan);

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_runs_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);

        {
            let mut scan = RangeScan::new(entries(&["a", "b"]).into_iter(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            // Consume only part of the scan
            let _ = scan.next();
        }

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closed_scan_yields_nothing() {
        let mut scan = RangeScan::new(entries(&["a", "b"]).into_iter(), || {});
        scan.close();
        assert!(scan.next().is_none());
    }

    #[test]
    fn error_ends_the_scan() {
        let items = vec![
            Ok(("a".to_string(), vec![])),
            Err(StoreError::ReadError("boom".into())),
            Ok(("c".to_string(), vec![])),
        ];
        let scan = RangeScan::new(items.into_iter(), || {});
        let collected: Vec<_> = scan.collect();

        assert_eq!(collected.len(), 2);
        assert!(collected[1].is_err());
    }
}
