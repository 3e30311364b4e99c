//! store::memory
//!
//! In-memory key-value store.
//!
//! # Design
//!
//! Entries live in a `BTreeMap`, so range scans come out in key order for
//! free. All state sits behind one `Mutex`, which makes `put_cas` atomic
//! with respect to every other operation on the same store.
//!
//! The store is cheap to clone; clones share state. It can be configured to
//! fail specific operations, which is how the error paths of the ledger
//! operations are exercised in tests.
//!
//! # Example
//!
//! ```
//! use voter_ledger::store::{KvStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.put("VOTER0", b"{}").unwrap();
//!
//! assert_eq!(store.get("VOTER0").unwrap(), Some(b"{}".to_vec()));
//! assert!(store.get("VOTER1").unwrap().is_none());
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{KvStore, RangeScan, ScanEntry, StoreError};

/// In-memory store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MemoryInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MemoryInner {
    /// Stored values by key.
    entries: BTreeMap<String, Vec<u8>>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Successful writes so far (`put` and `put_cas`).
    writes: usize,
    /// Scans handed out and not yet released.
    open_scans: usize,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    /// Fail every `get`.
    Get,
    /// Fail writes once `after` writes have succeeded.
    Put {
        /// Number of writes allowed before failing
        after: usize,
    },
    /// Fail opening a scan.
    Scan,
    /// Fail a scan when it reaches the entry at `index`.
    ScanEntry {
        /// Zero-based position of the failing entry
        index: usize,
    },
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.entries = entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
        }
        store
    }

    /// Configure the store to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use voter_ledger::store::{FailOn, KvStore, MemoryStore};
    ///
    /// let store = MemoryStore::new().fail_on(FailOn::Get);
    /// assert!(store.get("VOTER0").is_err());
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_on = None;
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Number of scans opened and not yet released.
    pub fn open_scans(&self) -> usize {
        self.inner.lock().map(|inner| inner.open_scans).unwrap_or(0)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    /// Check if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored entry, in key order.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.inner
            .lock()
            .map(|inner| inner.entries.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::LockError("memory store mutex poisoned".into()))
    }
}

impl MemoryInner {
    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        match &self.fail_on {
            Some(FailOn::Put { after }) if self.writes >= *after => Err(StoreError::WriteError(
                format!("injected write failure at {}", key),
            )),
            _ => Ok(()),
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let inner = self.lock()?;
        if inner.fail_on == Some(FailOn::Get) {
            return Err(StoreError::ReadError(format!(
                "injected read failure at {}",
                key
            )));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.check_write(key)?;
        inner.entries.insert(key.to_string(), value.to_vec());
        inner.writes += 1;
        Ok(())
    }

    fn put_cas(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.check_write(key)?;

        let current = inner.entries.get(key).map(Vec::as_slice);
        if current != expected {
            return Err(StoreError::CasFailed {
                key: key.to_string(),
            });
        }

        inner.entries.insert(key.to_string(), value.to_vec());
        inner.writes += 1;
        Ok(())
    }

    fn scan(&self, start: &str, end: &str) -> Result<RangeScan<'_>, StoreError> {
        let mut inner = self.lock()?;
        if inner.fail_on == Some(FailOn::Scan) {
            return Err(StoreError::ReadError("injected scan failure".into()));
        }

        // An inverted range is empty rather than a panic in BTreeMap::range
        let mut items: Vec<Result<ScanEntry, StoreError>> = if start < end {
            inner
                .entries
                .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
                .map(|(k, v)| Ok((k.clone(), v.clone())))
                .collect()
        } else {
            Vec::new()
        };

        if let Some(FailOn::ScanEntry { index }) = &inner.fail_on {
            let index = *index;
            if index < items.len() {
                items.truncate(index);
                items.push(Err(StoreError::ReadError(format!(
                    "injected scan failure at entry {}",
                    index
                ))));
            }
        }

        inner.open_scans += 1;
        drop(inner);

        let shared = Arc::clone(&self.inner);
        Ok(RangeScan::new(items.into_iter(), move || {
            if let Ok(mut inner) = shared.lock() {
                inner.open_scans = inner.open_scans.saturating_sub(1);
            }
        }))
    }
}
