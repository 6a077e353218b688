//! Storage key constants.

/// Storage keys used by the gate
pub struct StorageKeys;

impl StorageKeys {
    /// Persisted session identity slot (JSON `{ email, name }`)
    pub const USER_SESSION: &'static str = "user_session";

    /// Persisted account directory (JSON map of email to `{ name, password }`)
    pub const USER_ACCOUNTS: &'static str = "user_accounts";
}
