//! Credential-issuance request body.

use gate_auth::ReadyIdentity;
use serde_json::{json, Value};

/// Build the JSON body sent to the credential-issuance endpoint.
///
/// The email is the required identity field and the name rides along as the
/// display name. When an agent is configured, the body additionally declares
/// the desired agent for the room:
///
/// ```json
/// { "identity": "...", "name": "...",
///   "room_config": { "agents": [{ "agent_name": "..." }] } }
/// ```
pub fn build_token_request(identity: &ReadyIdentity, agent_name: Option<&str>) -> Value {
    let mut body = json!({
        "identity": identity.email(),
        "name": identity.name(),
    });

    if let Some(agent_name) = agent_name {
        body["room_config"] = json!({
            "agents": [{ "agent_name": agent_name }],
        });
    }

    body
}
