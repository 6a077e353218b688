//! Authentication state machine using rust-fsm.
//!
//! An explicit finite state machine for the gate, replacing implicit state
//! derivation from storage checks.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    SignedOut    │ (initial)
//! └────────┬────────┘
//!          │ Login
//!          ▼
//! ┌─────────────────┐
//! │    SignedIn     │ ◄── Login (re-login overwrites)
//! └────────┬────────┘
//!          │ Logout
//!          ▼
//!      SignedOut
//! ```
//!
//! There is no terminal state; the machine cycles between the two states for
//! the lifetime of the process.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `gate_machine` with:
// - gate_machine::State (enum)
// - gate_machine::Input (enum)
// - gate_machine::StateMachine (type alias)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub gate_machine(SignedOut)

    SignedOut => {
        Login => SignedIn
    },
    SignedIn => {
        Login => SignedIn,
        Logout => SignedOut
    }
}

// Re-export the generated types with clearer names
pub use gate_machine::Input as AuthMachineInput;
pub use gate_machine::State as AuthMachineState;
pub use gate_machine::StateMachine as AuthMachine;

/// User-friendly authentication state for external consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// Not authenticated; the gate renders the credential-entry flow.
    SignedOut,
    /// Authenticated with an identity held by the session manager.
    SignedIn,
}

impl AuthState {
    /// Returns true if the visitor holds an authenticated session.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::SignedIn)
    }
}

impl From<&AuthMachineState> for AuthState {
    fn from(state: &AuthMachineState) -> Self {
        match state {
            AuthMachineState::SignedOut => AuthState::SignedOut,
            AuthMachineState::SignedIn => AuthState::SignedIn,
        }
    }
}

/// Payload for auth state change events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStateChangedPayload {
    /// Current auth state.
    pub state: AuthState,
    /// Email if signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name if signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_signed_out() {
        let machine = AuthMachine::new();
        assert_eq!(*machine.state(), AuthMachineState::SignedOut);
    }

    #[test]
    fn test_login_transition() {
        let mut machine = AuthMachine::new();

        let result = machine.consume(&AuthMachineInput::Login);
        assert!(result.is_ok());
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_relogin_is_legal_while_signed_in() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::Login).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);

        // Re-login overwrites in place
        machine.consume(&AuthMachineInput::Login).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_logout_transition() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::Login).unwrap();
        machine.consume(&AuthMachineInput::Logout).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedOut);
    }

    #[test]
    fn test_logout_while_signed_out_is_invalid() {
        let mut machine = AuthMachine::new();

        let result = machine.consume(&AuthMachineInput::Logout);
        assert!(result.is_err());
        assert_eq!(*machine.state(), AuthMachineState::SignedOut);
    }

    #[test]
    fn test_machine_cycles_indefinitely() {
        let mut machine = AuthMachine::new();

        for _ in 0..3 {
            machine.consume(&AuthMachineInput::Login).unwrap();
            assert_eq!(*machine.state(), AuthMachineState::SignedIn);
            machine.consume(&AuthMachineInput::Logout).unwrap();
            assert_eq!(*machine.state(), AuthMachineState::SignedOut);
        }
    }

    #[test]
    fn test_auth_state_conversion() {
        assert_eq!(
            AuthState::from(&AuthMachineState::SignedOut),
            AuthState::SignedOut
        );
        assert_eq!(
            AuthState::from(&AuthMachineState::SignedIn),
            AuthState::SignedIn
        );
    }

    #[test]
    fn test_auth_state_is_authenticated() {
        assert!(!AuthState::SignedOut.is_authenticated());
        assert!(AuthState::SignedIn.is_authenticated());
    }
}
