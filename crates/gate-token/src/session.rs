//! The session boundary interface.
//!
//! The real-time session is an external collaborator that owns its own
//! lifecycle. This module defines the surface the gate consumes: a factory
//! that takes the token source plus options and returns a handle exposing
//! `end()`. The handle is handed to the session manager so logout can
//! terminate the session before clearing credentials.

use crate::{TokenResult, TokenSource};
use gate_auth::SessionHandle;
use gate_core::Config;

/// Options passed to the session boundary at connect time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Agent expected in the room, mirrored from the token request.
    pub agent_name: Option<String>,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            agent_name: config.agent_name.clone(),
        }
    }
}

/// Constructor surface of the external real-time session.
///
/// Implementations invoke the token source on connect (and on any later
/// reconnect); they must be given a freshly built source, never a stale one.
pub trait SessionConnector {
    fn connect(
        &self,
        source: TokenSource,
        options: SessionOptions,
    ) -> TokenResult<Box<dyn SessionHandle>>;
}
