//! Storage trait definitions.

use crate::StorageResult;

/// Trait for durable key-value storage backends
pub trait KeyValueStore: Send + Sync {
    /// Store a value, overwriting any prior contents (last-writer-wins)
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value, reporting whether anything was removed
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
