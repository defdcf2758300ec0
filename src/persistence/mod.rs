//! Key/value persistence and the progress snapshot store
//!
//! Storage is the only fallible boundary of the game. Backends report
//! `StorageError`; the stores built on top of them log and recover so that a
//! missing, disabled or corrupt store always reads as "no saved state".

use std::fmt;

pub mod progress;
pub mod storage;

pub use progress::{
    PROGRESS_KEY, ProgressSnapshot, ProgressStore, format_elapsed_since, sanitize,
};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use storage::{DisabledStorage, MemoryStorage};

#[derive(Debug)]
pub enum StorageError {
    /// Backend cannot be used at all (private mode, no window, disabled)
    Unavailable,
    /// Key cannot be mapped onto the backend
    InvalidKey(String),
    Io { key: String, source: std::io::Error },
    /// Error reported by a host API, already stringified
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: {key:?}"),
            Self::Io { key, source } => write!(f, "i/o error on {key:?}: {source}"),
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// String key/value store (LocalStorage semantics)
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
