//! Identity gating for the voice-agent session.
//!
//! This crate provides:
//! - A persistent account directory keyed by email
//! - Explicit FSM-based auth state management
//! - Session identity persistence across restarts
//! - The auth gate deciding whether the protected application is reachable
//! - The credential-entry (login/signup) flow

mod auth_fsm;
mod directory;
mod error;
mod flow;
mod gate;
mod identity;
mod session;

pub use auth_fsm::gate_machine;
pub use auth_fsm::{
    AuthMachine, AuthMachineInput, AuthMachineState, AuthState, AuthStateChangedPayload,
};
pub use directory::{AccountDirectory, AccountRecord, AccountStore};
pub use error::{AuthError, AuthResult};
pub use flow::{CredentialFlow, FlowError, FlowMode};
pub use gate::{evaluate_gate, GateDecision, ReadyIdentity};
pub use identity::Identity;
pub use session::{AuthStateCallback, SessionHandle, SessionManager};
