//! Session identity management with FSM-based state tracking.
//!
//! `SessionManager` owns the auth state machine and the persisted
//! `user_session` slot. It is constructed once and passed down to consumers;
//! it is the single writer of session state (login/logout), with read-only
//! access for everyone else.

use crate::auth_fsm::{AuthMachine, AuthMachineInput, AuthState, AuthStateChangedPayload};
use crate::{evaluate_gate, AuthError, AuthResult, GateDecision, Identity};
use gate_storage::{KeyValueStore, StorageKeys};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// The consumed surface of the real-time session boundary. The session object
/// itself is external; the gate only ever needs to end it.
pub trait SessionHandle: Send + Sync {
    /// Tear down the real-time session.
    fn end(&self);
}

/// Callback type for auth state change notifications.
///
/// Fired after login, logout, and restore settle; this is the hook that
/// forces the gate to re-evaluate (navigation back to the application root).
pub type AuthStateCallback = Box<dyn Fn(AuthStateChangedPayload) + Send + Sync>;

/// Session manager for authentication state.
///
/// The FSM tracks the signed-in/signed-out transitions; the identity itself
/// is persisted in the `user_session` slot so it survives restarts.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    /// Internal FSM for tracking auth state transitions.
    fsm: Mutex<AuthMachine>,
    /// The currently-authenticated identity, if any.
    identity: Mutex<Option<Identity>>,
    /// The active real-time session, attached after a successful connect.
    active_session: Mutex<Option<Box<dyn SessionHandle>>>,
    /// Optional callback for state change notifications.
    state_callback: Mutex<Option<AuthStateCallback>>,
}

impl SessionManager {
    /// Create a new session manager over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            fsm: Mutex::new(AuthMachine::new()),
            identity: Mutex::new(None),
            active_session: Mutex::new(None),
            state_callback: Mutex::new(None),
        }
    }

    /// Set a callback to be notified of auth state changes.
    pub fn set_state_callback(&self, callback: AuthStateCallback) {
        let mut cb = self.state_callback.lock().unwrap();
        *cb = Some(callback);
    }

    /// Get the current auth state.
    pub fn state(&self) -> AuthState {
        let fsm = self.fsm.lock().unwrap();
        AuthState::from(fsm.state())
    }

    /// Get the currently-authenticated identity, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().unwrap().clone()
    }

    /// Evaluate the gate against the current identity.
    pub fn gate(&self) -> GateDecision {
        evaluate_gate(self.current_identity().as_ref())
    }

    /// Restore session state from the persisted slot.
    ///
    /// Called once at startup. An absent slot leaves the manager signed out;
    /// a malformed slot is logged, destroyed, and likewise leaves the manager
    /// signed out. Neither surfaces an error to the visitor.
    pub fn restore(&self) -> AuthState {
        let raw = match self.store.get(StorageKeys::USER_SESSION) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No persisted session found");
                return AuthState::SignedOut;
            }
            Err(e) => {
                warn!(error = %e, "Failed reading persisted session, staying signed out");
                return AuthState::SignedOut;
            }
        };

        let identity: Identity = match serde_json::from_str(&raw) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Malformed persisted session, clearing slot");
                if let Err(e) = self.store.delete(StorageKeys::USER_SESSION) {
                    warn!(error = %e, "Failed clearing malformed session slot");
                }
                return AuthState::SignedOut;
            }
        };

        info!(email = %identity.email, "Restored persisted session");
        *self.identity.lock().unwrap() = Some(identity);
        // Login is legal from the initial state; restore can only run into an
        // already-signed-in machine if called twice, which re-login permits.
        if let Err(e) = self.transition(&AuthMachineInput::Login) {
            warn!(error = %e, "Restore transition rejected");
            return AuthState::SignedOut;
        }
        AuthState::SignedIn
    }

    /// Authenticate as the given identity.
    ///
    /// Writes the persisted slot before mutating in-memory state, so a crash
    /// between the two re-authenticates on restart rather than losing the
    /// login. Legal from any state; re-login overwrites.
    pub fn login(&self, identity: Identity) -> AuthResult<()> {
        let raw = serde_json::to_string(&identity)?;
        self.store.set(StorageKeys::USER_SESSION, &raw)?;

        *self.identity.lock().unwrap() = Some(identity.clone());
        self.transition(&AuthMachineInput::Login)?;

        info!(email = %identity.email, "Login successful");
        self.notify_state_change(AuthState::SignedIn);
        Ok(())
    }

    /// Attach the active real-time session so logout can terminate it.
    /// Replaces (and ends) any previously attached session.
    pub fn attach_session(&self, handle: Box<dyn SessionHandle>) {
        let previous = self.active_session.lock().unwrap().replace(handle);
        if let Some(previous) = previous {
            debug!("Replacing active session, ending the previous one");
            previous.end();
        }
    }

    /// Sign out.
    ///
    /// Ordered side effects: the active session is ended first, then the
    /// persisted slot is cleared, then in-memory state flips, and only then
    /// does the state callback fire. A reload mid-logout therefore never
    /// resurrects a session whose termination was only partially applied.
    /// Logging out while already signed out is a no-op.
    pub fn logout(&self) -> AuthResult<()> {
        if !self.state().is_authenticated() {
            debug!("Logout requested while signed out, ignoring");
            return Ok(());
        }

        if let Some(session) = self.active_session.lock().unwrap().take() {
            info!("Ending active session before clearing credentials");
            session.end();
        }

        self.store.delete(StorageKeys::USER_SESSION)?;

        self.transition(&AuthMachineInput::Logout)?;
        *self.identity.lock().unwrap() = None;

        info!("Logged out");
        self.notify_state_change(AuthState::SignedOut);
        Ok(())
    }

    /// Transition the FSM.
    fn transition(&self, input: &AuthMachineInput) -> AuthResult<AuthState> {
        let mut fsm = self.fsm.lock().unwrap();
        fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;
        let new_state = AuthState::from(fsm.state());
        debug!(state = ?new_state, "Auth state transition");
        Ok(new_state)
    }

    /// Notify the callback of a state change.
    fn notify_state_change(&self, state: AuthState) {
        let cb = self.state_callback.lock().unwrap();
        if let Some(callback) = cb.as_ref() {
            let (email, name) = self
                .current_identity()
                .map(|i| (Some(i.email), Some(i.name)))
                .unwrap_or((None, None));

            callback(AuthStateChangedPayload { state, email, name });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_storage::StorageResult;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory store for testing.
    struct MemoryStore {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    impl KeyValueStore for MemoryStore {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn delete(&self, key: &str) -> StorageResult<bool> {
            Ok(self.data.lock().unwrap().remove(key).is_some())
        }
    }

    fn create_test_manager() -> (Arc<dyn KeyValueStore>, SessionManager) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (store.clone(), SessionManager::new(store))
    }

    /// Session handle that records whether the persisted slot was still
    /// present at the moment `end()` ran.
    struct RecordingSession {
        store: Arc<dyn KeyValueStore>,
        ended: Arc<AtomicUsize>,
        slot_present_at_end: Arc<std::sync::atomic::AtomicBool>,
    }

    impl SessionHandle for RecordingSession {
        fn end(&self) {
            let present = self.store.has(StorageKeys::USER_SESSION).unwrap();
            self.slot_present_at_end.store(present, Ordering::SeqCst);
            self.ended.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_initial_state_signed_out() {
        let (_store, manager) = create_test_manager();
        assert_eq!(manager.state(), AuthState::SignedOut);
        assert!(manager.current_identity().is_none());
        assert_eq!(manager.gate(), GateDecision::Challenge);
    }

    #[test]
    fn test_login_persists_slot() {
        let (store, manager) = create_test_manager();

        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();

        assert_eq!(manager.state(), AuthState::SignedIn);
        assert_eq!(
            manager.current_identity(),
            Some(Identity::new("ada@x.com", "Ada"))
        );

        let raw = store.get(StorageKeys::USER_SESSION).unwrap().unwrap();
        let persisted: Identity = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, Identity::new("ada@x.com", "Ada"));
    }

    #[test]
    fn test_relogin_overwrites() {
        let (_store, manager) = create_test_manager();

        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();
        manager.login(Identity::new("grace@x.com", "Grace")).unwrap();

        assert_eq!(
            manager.current_identity(),
            Some(Identity::new("grace@x.com", "Grace"))
        );
    }

    #[test]
    fn test_restore_absent_slot() {
        let (_store, manager) = create_test_manager();
        assert_eq!(manager.restore(), AuthState::SignedOut);
        assert!(manager.current_identity().is_none());
    }

    #[test]
    fn test_restore_valid_slot() {
        let (store, manager) = create_test_manager();
        store
            .set(StorageKeys::USER_SESSION, r#"{"email":"ada@x.com","name":"Ada"}"#)
            .unwrap();

        assert_eq!(manager.restore(), AuthState::SignedIn);
        assert_eq!(
            manager.current_identity(),
            Some(Identity::new("ada@x.com", "Ada"))
        );
        assert!(manager.gate().is_admitted());
    }

    #[test]
    fn test_restore_malformed_slot_clears_it() {
        let (store, manager) = create_test_manager();
        store.set(StorageKeys::USER_SESSION, "{{not json").unwrap();

        assert_eq!(manager.restore(), AuthState::SignedOut);
        assert!(manager.current_identity().is_none());
        // The corrupt slot is destroyed, not left to fail again next start
        assert!(!store.has(StorageKeys::USER_SESSION).unwrap());
    }

    #[test]
    fn test_logout_clears_slot_and_identity() {
        let (store, manager) = create_test_manager();

        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();
        manager.logout().unwrap();

        assert_eq!(manager.state(), AuthState::SignedOut);
        assert!(manager.current_identity().is_none());
        assert!(!store.has(StorageKeys::USER_SESSION).unwrap());
        assert_eq!(manager.gate(), GateDecision::Challenge);
    }

    #[test]
    fn test_logout_while_signed_out_is_noop() {
        let (_store, manager) = create_test_manager();
        manager.logout().unwrap();
        assert_eq!(manager.state(), AuthState::SignedOut);
    }

    #[test]
    fn test_logout_ends_session_before_clearing_slot() {
        let (store, manager) = create_test_manager();
        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();

        let ended = Arc::new(AtomicUsize::new(0));
        let slot_present_at_end = Arc::new(std::sync::atomic::AtomicBool::new(false));
        manager.attach_session(Box::new(RecordingSession {
            store: store.clone(),
            ended: ended.clone(),
            slot_present_at_end: slot_present_at_end.clone(),
        }));

        manager.logout().unwrap();

        assert_eq!(ended.load(Ordering::SeqCst), 1);
        // Session termination must have happened while the slot still existed
        assert!(slot_present_at_end.load(Ordering::SeqCst));
        assert!(!store.has(StorageKeys::USER_SESSION).unwrap());
    }

    #[test]
    fn test_attach_session_replaces_and_ends_previous() {
        let (store, manager) = create_test_manager();
        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();

        let first_ended = Arc::new(AtomicUsize::new(0));
        manager.attach_session(Box::new(RecordingSession {
            store: store.clone(),
            ended: first_ended.clone(),
            slot_present_at_end: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }));

        let second_ended = Arc::new(AtomicUsize::new(0));
        manager.attach_session(Box::new(RecordingSession {
            store: store.clone(),
            ended: second_ended.clone(),
            slot_present_at_end: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }));

        assert_eq!(first_ended.load(Ordering::SeqCst), 1);
        assert_eq!(second_ended.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_logout_preserves_account_directory() {
        let (store, manager) = create_test_manager();
        store
            .set(StorageKeys::USER_ACCOUNTS, r#"{"ada@x.com":{"name":"Ada","password":"p1"}}"#)
            .unwrap();

        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();
        manager.logout().unwrap();

        // Only session state is cleared; the directory survives so the same
        // visitor can re-authenticate
        assert!(store.has(StorageKeys::USER_ACCOUNTS).unwrap());
    }

    #[test]
    fn test_state_callback_fires_on_login_and_logout() {
        let (_store, manager) = create_test_manager();

        let events: Arc<Mutex<Vec<AuthStateChangedPayload>>> = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        manager.set_state_callback(Box::new(move |payload| {
            events_clone.lock().unwrap().push(payload);
        }));

        manager.login(Identity::new("ada@x.com", "Ada")).unwrap();
        manager.logout().unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].state, AuthState::SignedIn);
        assert_eq!(events[0].email.as_deref(), Some("ada@x.com"));
        assert_eq!(events[1].state, AuthState::SignedOut);
        assert!(events[1].email.is_none());
    }
}
