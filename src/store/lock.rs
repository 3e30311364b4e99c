//! store::lock
//!
//! OS-level lock guarding a file-backed store.
//!
//! # Architecture
//!
//! The lock lives in a sidecar file next to the data file
//! (`ledger.toml` is guarded by `ledger.toml.lock`). Readers take a shared
//! lock, writers an exclusive one. Because `fs2` locks are process-wide
//! advisory locks, this serializes every `FileStore` in every process that
//! points at the same data file.
//!
//! # Invariants
//!
//! - Every write (including the compare step of CAS) happens under an
//!   exclusive lock
//! - A range scan holds a shared lock for its whole lifetime
//! - Lock is automatically released on drop (RAII pattern)
//!
//! # Example
//!
//! ```no_run
//! use voter_ledger::store::lock::{LockMode, StoreLock};
//! use std::path::Path;
//!
//! let lock = StoreLock::acquire(Path::new("/tmp/ledger.toml"), LockMode::Exclusive)?;
//! assert!(lock.is_held());
//!
//! // Lock released when dropped
//! drop(lock);
//! # Ok::<(), voter_ledger::store::lock::LockError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

// Called through the trait path; newer std has inherent `File` lock methods
// with different signatures.
use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// How the lock is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Many readers may hold the lock at once.
    Shared,
    /// A single writer holds the lock.
    Exclusive,
}

/// A held lock on a store's sidecar lock file.
///
/// The lock is automatically released when this guard is dropped.
#[derive(Debug)]
pub struct StoreLock {
    /// Path to the lock file.
    path: PathBuf,
    /// How the lock is held.
    mode: LockMode,
    /// The open file handle with the lock held.
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl StoreLock {
    /// Path of the lock file guarding `data_path`.
    ///
    /// # Example
    ///
    /// ```
    /// use voter_ledger::store::lock::StoreLock;
    /// use std::path::{Path, PathBuf};
    ///
    /// assert_eq!(
    ///     StoreLock::lock_path_for(Path::new("/data/ledger.toml")),
    ///     PathBuf::from("/data/ledger.toml.lock")
    /// );
    /// ```
    pub fn lock_path_for(data_path: &Path) -> PathBuf {
        let mut name = data_path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Acquire the lock for `data_path`, blocking until it is available.
    ///
    /// Creates the parent directory and lock file if needed.
    ///
    /// # Errors
    ///
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(data_path: &Path, mode: LockMode) -> Result<Self, LockError> {
        let (path, file) = Self::open(data_path)?;

        let result = match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        };
        result.map_err(|e| LockError::AcquireFailed(e.to_string()))?;

        Ok(Self {
            path,
            mode,
            file: Some(file),
        })
    }

    /// Try to acquire the lock without blocking.
    ///
    /// Returns `Ok(None)` if a conflicting lock is held elsewhere.
    pub fn try_acquire(data_path: &Path, mode: LockMode) -> Result<Option<Self>, LockError> {
        let (path, file) = Self::open(data_path)?;

        let result = match mode {
            LockMode::Shared => FileExt::try_lock_shared(&file),
            LockMode::Exclusive => FileExt::try_lock_exclusive(&file),
        };
        match result {
            Ok(()) => Ok(Some(Self {
                path,
                mode,
                file: Some(file),
            })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    fn open(data_path: &Path) -> Result<(PathBuf, File), LockError> {
        if let Some(parent) = data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let path = Self::lock_path_for(data_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        Ok((path, file))
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// The mode this lock was acquired in.
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    ///
    /// This is called automatically on drop, but can be called early.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            FileExt::unlock(&file)
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Best-effort release on drop - ignore errors since we're dropping
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
    }
}
