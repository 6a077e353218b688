//! Token-fetch strategies.
//!
//! Two strategies, chosen once at construction from configuration rather
//! than branched at call sites: the configured credential-issuance endpoint,
//! or the hosted sandbox token service when a sandbox ID is set.

use crate::{build_token_request, TokenError, TokenResult};
use gate_auth::ReadyIdentity;
use gate_core::Config;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Hosted sandbox connection-details endpoint.
pub const SANDBOX_ENDPOINT: &str = "https://cloud-api.livekit.io/api/sandbox/connection-details";

/// A deferred, parameterless token fetch bound to one identity and one agent
/// configuration. Rebuild it whenever either changes; never hand a stale
/// source to the session boundary.
pub enum TokenSource {
    Endpoint(EndpointTokenSource),
    Sandbox(SandboxTokenSource),
}

impl TokenSource {
    /// Select the strategy from configuration and bind it to an admitted
    /// identity. Sandbox wins when a sandbox ID is configured.
    pub fn for_identity(config: &Config, identity: ReadyIdentity) -> TokenResult<Self> {
        match &config.sandbox_id {
            Some(sandbox_id) => Ok(Self::Sandbox(SandboxTokenSource::new(
                sandbox_id.clone(),
                identity,
                config.agent_name.clone(),
            )?)),
            None => Ok(Self::Endpoint(EndpointTokenSource::new(
                config.token_endpoint()?,
                identity,
                config.agent_name.clone(),
            ))),
        }
    }

    /// Fetch a connection credential.
    ///
    /// The response payload is passed through verbatim; a non-success status
    /// or network failure is an error, never an empty credential.
    pub async fn fetch(&self) -> TokenResult<Value> {
        match self {
            Self::Endpoint(source) => source.fetch().await,
            Self::Sandbox(source) => source.fetch().await,
        }
    }

    /// The identity this source was built for.
    pub fn identity(&self) -> &ReadyIdentity {
        match self {
            Self::Endpoint(source) => &source.identity,
            Self::Sandbox(source) => &source.identity,
        }
    }

    /// The agent name this source will declare, if any.
    pub fn agent_name(&self) -> Option<&str> {
        match self {
            Self::Endpoint(source) => source.agent_name.as_deref(),
            Self::Sandbox(source) => source.agent_name.as_deref(),
        }
    }
}

/// Fetches credentials from the configured credential-issuance endpoint.
pub struct EndpointTokenSource {
    client: Client,
    endpoint: Url,
    identity: ReadyIdentity,
    agent_name: Option<String>,
}

impl EndpointTokenSource {
    pub fn new(endpoint: Url, identity: ReadyIdentity, agent_name: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            identity,
            agent_name,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn fetch(&self) -> TokenResult<Value> {
        let body = build_token_request(&self.identity, self.agent_name.as_deref());

        debug!(endpoint = %self.endpoint, "Requesting connection credential");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        read_credential(response).await
    }
}

/// Fetches credentials from the hosted sandbox token service, identified by
/// a sandbox ID header instead of a self-hosted endpoint.
pub struct SandboxTokenSource {
    client: Client,
    endpoint: Url,
    sandbox_id: String,
    identity: ReadyIdentity,
    agent_name: Option<String>,
}

impl SandboxTokenSource {
    pub fn new(
        sandbox_id: String,
        identity: ReadyIdentity,
        agent_name: Option<String>,
    ) -> TokenResult<Self> {
        let endpoint = Url::parse(SANDBOX_ENDPOINT).map_err(gate_core::CoreError::from)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            sandbox_id,
            identity,
            agent_name,
        })
    }

    pub async fn fetch(&self) -> TokenResult<Value> {
        let body = build_token_request(&self.identity, self.agent_name.as_deref());

        debug!(sandbox_id = %self.sandbox_id, "Requesting sandbox connection credential");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Sandbox-ID", &self.sandbox_id)
            .json(&body)
            .send()
            .await?;

        read_credential(response).await
    }
}

/// Turn an endpoint response into a credential payload or a descriptive
/// error. The success body is opaque and returned unmodified.
async fn read_credential(response: reqwest::Response) -> TokenResult<Value> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(TokenError::Endpoint { status, body });
    }

    let payload: Value = response.json().await?;
    Ok(payload)
}
