//! Configuration for the gate and token provisioner.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

/// Default credential-issuance endpoint (can be overridden at compile time
/// via the VOICEGATE_TOKEN_ENDPOINT env var).
pub const DEFAULT_TOKEN_ENDPOINT: &str = match option_env!("VOICEGATE_TOKEN_ENDPOINT") {
    Some(url) => url,
    None => "https://agents.example.com/api/connection-details",
};

/// Default sandbox ID (compile-time only; absent unless set via
/// VOICEGATE_SANDBOX_ID at build time).
pub const DEFAULT_SANDBOX_ID: Option<&str> = option_env!("VOICEGATE_SANDBOX_ID");

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default page title shown by the credential-entry flow.
pub const DEFAULT_PAGE_TITLE: &str = "Voice Agent";

/// Agent configuration, read-only to the gate and provisioner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Display title for the credential-entry flow.
    #[serde(default = "default_page_title")]
    pub page_title: String,
    /// Agent requested for the room, if any.
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Credential-issuance endpoint URL.
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    /// Sandbox ID; when set, token provisioning short-circuits to the
    /// hosted sandbox token source instead of `token_endpoint`.
    #[serde(default = "default_sandbox_id")]
    pub sandbox_id: Option<String>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_page_title() -> String {
    DEFAULT_PAGE_TITLE.to_string()
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

fn default_sandbox_id() -> Option<String> {
    DEFAULT_SANDBOX_ID.map(|s| s.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            page_title: default_page_title(),
            agent_name: None,
            token_endpoint: default_token_endpoint(),
            sandbox_id: default_sandbox_id(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from a file, falling back to defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            debug!(path = %config_path.display(), "No config file found, using defaults");
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("VOICEGATE_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(agent_name) = std::env::var("VOICEGATE_AGENT_NAME") {
            if !agent_name.is_empty() {
                self.agent_name = Some(agent_name);
            }
        }
        if let Ok(sandbox_id) = std::env::var("VOICEGATE_SANDBOX_ID") {
            if !sandbox_id.is_empty() {
                self.sandbox_id = Some(sandbox_id);
            }
        }
    }

    /// Get the token endpoint as a parsed URL.
    pub fn token_endpoint(&self) -> CoreResult<Url> {
        Url::parse(&self.token_endpoint).map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.page_title, DEFAULT_PAGE_TITLE);
        assert_eq!(config.token_endpoint, DEFAULT_TOKEN_ENDPOINT);
        assert!(config.agent_name.is_none());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "log_level": "debug",
            "agent_name": "support"
        }"#;

        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.agent_name.as_deref(), Some("support"));
        assert_eq!(config.token_endpoint, DEFAULT_TOKEN_ENDPOINT);
    }

    #[test]
    fn test_config_load_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "not json").unwrap();

        let result = Config::load_from_file(&config_path);
        assert!(matches!(result, Err(CoreError::Json(_))));
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = Config::default();
        config.page_title = "Support Desk".to_string();
        config.agent_name = Some("support".to_string());

        config.save(&paths).unwrap();

        let loaded = Config::load(&paths).unwrap();
        assert_eq!(loaded.page_title, "Support Desk");
        assert_eq!(loaded.agent_name.as_deref(), Some("support"));
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.token_endpoint, DEFAULT_TOKEN_ENDPOINT);
    }

    #[test]
    fn test_config_token_endpoint_parse() {
        let config = Config::default();
        let url = config.token_endpoint().unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_config_invalid_endpoint() {
        let mut config = Config::default();
        config.token_endpoint = "not a valid url".to_string();

        assert!(config.token_endpoint().is_err());
    }
}
