//! Durable key-value storage for gate state.
//!
//! This crate provides the persisted slots behind the account directory and
//! the session identity: a `KeyValueStore` trait plus a file-backed default
//! implementation. Values are opaque strings; callers own the JSON encoding.

mod file_store;
mod keys;
mod traits;

pub use file_store::FileStore;
pub use keys::StorageKeys;
pub use traits::KeyValueStore;

use gate_core::Paths;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters that are not path-safe
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Platform-specific storage error
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed store rooted under the gate's base
/// directory.
pub fn create_store(paths: &Paths) -> StorageResult<Box<dyn KeyValueStore>> {
    let store = FileStore::new(paths.store_dir())?;
    Ok(Box::new(store))
}
