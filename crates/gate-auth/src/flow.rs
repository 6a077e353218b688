//! The credential-entry (login/signup) flow.
//!
//! Collects a name/email/password set, validates it in submission order with
//! a single error surfaced at a time, and on success creates or checks an
//! account before driving the session manager's login transition.

use crate::{AccountRecord, AccountStore, AuthError, Identity, SessionManager};
use thiserror::Error;
use tracing::debug;

/// Which form the flow is presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    Login,
    Signup,
}

/// Validation and submission errors, with the exact messages shown inline.
/// Only the first failure is surfaced per submission.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("All fields are required")]
    AllFieldsRequired,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Email and password are required")]
    CredentialsRequired,

    /// Same message for unknown email and wrong password; the flow never
    /// leaks which case occurred.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Persistence failure during an otherwise valid submission.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Form state for the credential-entry flow.
#[derive(Default)]
pub struct CredentialFlow {
    mode: FlowMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    error: Option<String>,
}

impl Default for FlowMode {
    fn default() -> Self {
        FlowMode::Login
    }
}

impl CredentialFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FlowMode {
        self.mode
    }

    /// The current inline error message, if the last submission failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch between login and signup. Clears all fields and the error so
    /// no stale state carries across modes.
    pub fn set_mode(&mut self, mode: FlowMode) {
        self.mode = mode;
        self.name.clear();
        self.email.clear();
        self.password.clear();
        self.confirm.clear();
        self.error = None;
    }

    /// Submit the form against the account store.
    ///
    /// Validation runs in order and the first failure wins; the resulting
    /// message is also recorded on the flow for inline display. On success
    /// the session manager's login transition fires, which in turn notifies
    /// the gate to re-evaluate. The flow stays usable after any error.
    pub fn submit(
        &mut self,
        accounts: &AccountStore,
        session: &SessionManager,
    ) -> Result<(), FlowError> {
        self.error = None;

        let result = match self.mode {
            FlowMode::Signup => self.submit_signup(accounts, session),
            FlowMode::Login => self.submit_login(accounts, session),
        };

        if let Err(e) = &result {
            debug!(mode = ?self.mode, error = %e, "Credential submission rejected");
            self.error = Some(e.to_string());
        }
        result
    }

    fn submit_signup(
        &self,
        accounts: &AccountStore,
        session: &SessionManager,
    ) -> Result<(), FlowError> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm.is_empty()
        {
            return Err(FlowError::AllFieldsRequired);
        }
        if !is_valid_email(&self.email) {
            return Err(FlowError::InvalidEmail);
        }
        if self.password != self.confirm {
            return Err(FlowError::PasswordMismatch);
        }

        let mut directory = accounts.load();
        if directory.contains_key(&self.email) {
            return Err(FlowError::EmailTaken);
        }

        directory.insert(
            self.email.clone(),
            AccountRecord {
                name: self.name.clone(),
                password: self.password.clone(),
            },
        );
        accounts.save(&directory)?;

        session.login(Identity::new(self.email.clone(), self.name.clone()))?;
        Ok(())
    }

    fn submit_login(
        &self,
        accounts: &AccountStore,
        session: &SessionManager,
    ) -> Result<(), FlowError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FlowError::CredentialsRequired);
        }

        let directory = accounts.load();
        let stored_name = match directory.get(&self.email) {
            Some(record) if record.password == self.password => record.name.clone(),
            // Unknown email and wrong password are indistinguishable
            _ => return Err(FlowError::InvalidCredentials),
        };

        session.login(Identity::new(self.email.clone(), stored_name))?;
        Ok(())
    }
}

/// Email shape check: non-empty local part, `@`, non-empty domain, `.`,
/// non-empty tld, with no `@` or whitespace inside any part.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    if value.chars().filter(|c| *c == '@').count() != 1 {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
