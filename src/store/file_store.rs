//! store::file_store
//!
//! File-backed key-value store.
//!
//! # Storage
//!
//! - Entries are stored as a TOML table of `key = "value"` strings
//! - Values must be valid UTF-8 (ledger records are JSON text)
//! - All writes are atomic (write to temp file, then rename)
//! - A sidecar `<file>.lock` serializes access across processes
//!
//! # Example
//!
//! ```no_run
//! use voter_ledger::store::{FileStore, KvStore};
//!
//! let store = FileStore::with_path("/tmp/ledger.toml".into());
//! store.put("VOTER0", br#"{"vote":"SINVOTAR"}"#)?;
//!
//! if let Some(value) = store.get("VOTER0")? {
//!     println!("{}", String::from_utf8_lossy(&value));
//! }
//! # Ok::<(), voter_ledger::store::StoreError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use super::lock::{LockMode, StoreLock};
use super::traits::{KvStore, RangeScan, ScanEntry, StoreError};

/// File-based store.
///
/// Every call re-reads the file, so several `FileStore` instances (in one
/// process or many) pointing at the same path observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Path to the data file
    path: PathBuf,
}

impl FileStore {
    /// Create a file store at the default location.
    ///
    /// The default location is `~/.vledger/ledger.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Create a file store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The default data file location.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::ReadError("cannot determine home directory".into()))?;
        Ok(home.join(".vledger").join("ledger.toml"))
    }

    /// Get the path to the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, mode: LockMode) -> Result<StoreLock, StoreError> {
        StoreLock::acquire(&self.path, mode).map_err(|e| StoreError::LockError(e.to_string()))
    }

    /// Scratch file for atomic writes: the data file name plus `.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read all entries from the file. Caller must hold the lock.
    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read store file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| StoreError::ReadError(format!("cannot parse store file: {}", e)))
    }

    /// Write all entries atomically. Caller must hold the exclusive lock.
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(entries)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize store: {}", e)))?;

        // Write to a temp file first for atomicity
        let temp_path = self.temp_path();
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write store: {}", e)))?;

            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }
}

fn utf8_value(key: &str, value: &[u8]) -> Result<String, StoreError> {
    String::from_utf8(value.to_vec()).map_err(|_| StoreError::InvalidValue {
        key: key.to_string(),
        message: "file store values must be valid UTF-8".into(),
    })
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let _lock = self.lock(LockMode::Shared)?;
        let entries = self.read_entries()?;
        Ok(entries.get(key).map(|v| v.as_bytes().to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let value = utf8_value(key, value)?;

        let _lock = self.lock(LockMode::Exclusive)?;
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }

    fn put_cas(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<(), StoreError> {
        let value = utf8_value(key, value)?;

        let _lock = self.lock(LockMode::Exclusive)?;
        let mut entries = self.read_entries()?;

        let current = entries.get(key).map(|v| v.as_bytes());
        if current != expected {
            return Err(StoreError::CasFailed {
                key: key.to_string(),
            });
        }

        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }

    fn scan(&self, start: &str, end: &str) -> Result<RangeScan<'_>, StoreError> {
        let lock = self.lock(LockMode::Shared)?;
        let entries = self.read_entries()?;

        let items: Vec<Result<ScanEntry, StoreError>> = if start < end {
            entries
                .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
                .map(|(k, v)| Ok((k.clone(), v.as_bytes().to_vec())))
                .collect()
        } else {
            Vec::new()
        };

        // The shared lock stays held until the scan is closed or dropped
        Ok(RangeScan::new(items.into_iter(), move || drop(lock)))
    }
}
