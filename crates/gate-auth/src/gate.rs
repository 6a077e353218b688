//! The auth gate.
//!
//! A pure gating decision, evaluated once per render pass, followed by
//! construction of dependent state only inside the admitted branch. Anything
//! that needs the identity downstream (the token source in particular) takes
//! a `ReadyIdentity`, which cannot be built from partial data.

use crate::Identity;

/// An identity that passed the readiness predicate: both email and name are
/// non-empty. Fields are private so the only way in is through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyIdentity {
    email: String,
    name: String,
}

impl ReadyIdentity {
    /// Build from an identity, refusing partially-populated ones.
    pub fn try_from_identity(identity: &Identity) -> Option<Self> {
        if identity.email.is_empty() || identity.name.is_empty() {
            return None;
        }
        Some(Self {
            email: identity.email.clone(),
            name: identity.name.clone(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of evaluating the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the protected application with this identity.
    Admitted(ReadyIdentity),
    /// Render the credential-entry flow.
    Challenge,
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admitted(_))
    }
}

/// Readiness predicate: admit only when an identity is present and both its
/// fields are non-empty. Any other condition challenges.
pub fn evaluate_gate(identity: Option<&Identity>) -> GateDecision {
    match identity.and_then(ReadyIdentity::try_from_identity) {
        Some(ready) => GateDecision::Admitted(ready),
        None => GateDecision::Challenge,
    }
}
