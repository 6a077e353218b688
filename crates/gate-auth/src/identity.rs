//! The authenticated visitor's identity.

use serde::{Deserialize, Serialize};

/// Email and display name of an authenticated visitor.
///
/// Serializes to the persisted `user_session` slot format
/// (`{ "email": .., "name": .. }`). Both fields may be empty here; the gate
/// refuses admission until both are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}
