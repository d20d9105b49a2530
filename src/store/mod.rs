//! # Store Module
//!
//! Key-value persistence for survey answers.
//!
//! The handler only needs "write accepted, retrievable later by key", so the
//! contract is a two-method trait. Values are the JSON-serialized answers and
//! keys are opaque strings (ULIDs in practice).
//!
//! ## Backends
//!
//! - [`MemoryStore`] - concurrent in-process map, the default for development and tests
//! - [`FileStore`] - one JSON file per key under a data directory
//!
//! Both are `Send + Sync` and shared between connection coroutines through
//! `Arc<dyn KvStore>`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::io;

/// Errors surfaced by a [`KvStore`] backend.
#[derive(Debug)]
pub enum StoreError {
    /// Key cannot be used by this backend.
    InvalidKey {
        /// The rejected key
        key: String,
    },
    /// Underlying I/O failed while reading or writing `key`.
    Io {
        /// Key being accessed
        key: String,
        /// Original I/O error
        source: io::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidKey { key } => {
                write!(
                    f,
                    "invalid store key '{key}': only ASCII letters, digits, '-' and '_' are allowed"
                )
            }
            StoreError::Io { key, source } => {
                write!(f, "store I/O error for key '{key}': {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::InvalidKey { .. } => None,
            StoreError::Io { source, .. } => Some(source),
        }
    }
}

/// Minimal key-value contract consumed by the survey handler.
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write was not accepted.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Keys must be safe to use as a file name on every backend.
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey {
            key: key.to_string(),
        })
    }
}
