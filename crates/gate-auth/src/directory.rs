//! Persistent account directory.
//!
//! Pure data access over the `user_accounts` slot; the credential-entry flow
//! owns all policy (uniqueness checks, validation, password comparison).

use crate::AuthResult;
use gate_storage::{KeyValueStore, StorageKeys};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A stored account, keyed by email in the directory.
///
/// The password is stored as submitted. There is no backend in the intended
/// deployment, so nothing ever leaves the visitor's machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub password: String,
}

/// Mapping of email to account record. Keys are unique and case-sensitive
/// as stored.
pub type AccountDirectory = HashMap<String, AccountRecord>;

/// Data access for the persisted account directory.
pub struct AccountStore {
    store: Arc<dyn KeyValueStore>,
}

impl AccountStore {
    /// Create an account store over the given key-value backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the directory from the persisted slot.
    ///
    /// An absent slot and any read or deserialization failure all yield an
    /// empty directory. Malformed state is a recoverable condition, never
    /// surfaced to the visitor.
    pub fn load(&self) -> AccountDirectory {
        let raw = match self.store.get(StorageKeys::USER_ACCOUNTS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AccountDirectory::new(),
            Err(e) => {
                warn!(error = %e, "Failed reading account directory, defaulting to empty");
                return AccountDirectory::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(directory) => directory,
            Err(e) => {
                warn!(error = %e, "Malformed account directory, defaulting to empty");
                AccountDirectory::new()
            }
        }
    }

    /// Serialize and persist the full directory, overwriting prior contents.
    ///
    /// Last-writer-wins; all mutation happens synchronously within one
    /// visitor's form submission, so there is no merge and no locking.
    pub fn save(&self, directory: &AccountDirectory) -> AuthResult<()> {
        let raw = serde_json::to_string(directory)?;
        self.store.set(StorageKeys::USER_ACCOUNTS, &raw)?;
        Ok(())
    }
}
