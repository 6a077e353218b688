//! Token provisioning for the real-time session.
//!
//! Once the gate admits an identity, this crate turns it into a deferred,
//! parameterless async token fetch: `TokenSource::for_identity` captures the
//! identity and agent configuration by value, and `fetch` exchanges them for
//! an opaque connection credential at the configured endpoint. Sources are
//! cheap to construct and must be rebuilt whenever the identity or the agent
//! configuration changes.

mod error;
mod request;
mod session;
mod source;

pub use error::{TokenError, TokenResult};
pub use request::build_token_request;
pub use session::{SessionConnector, SessionOptions};
pub use source::{EndpointTokenSource, SandboxTokenSource, TokenSource, SANDBOX_ENDPOINT};

// The session boundary's teardown surface lives with the auth crate because
// logout must be able to end the session; re-exported here for connectors.
pub use gate_auth::SessionHandle;
