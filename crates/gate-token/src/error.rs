//! Token provisioning error types.

use thiserror::Error;

/// Token provisioning error type.
///
/// A provisioning failure is fatal for that connection attempt; there is no
/// retry layer here. The credential-entry flow and account store are
/// unaffected by any of these.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The endpoint answered with a non-success status
    #[error("Credential endpoint returned HTTP {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// Network-level or decode failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (bad endpoint URL)
    #[error(transparent)]
    Core(#[from] gate_core::CoreError),
}

/// Result type alias using TokenError.
pub type TokenResult<T> = Result<T, TokenError>;
