//! Client configuration structure
//!
//! Every field has a default so a configuration file only needs to carry the
//! values it overrides. Loading from the environment or from disk lives in
//! the client crate.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.bleemeo.com";
pub const DEFAULT_OAUTH_CLIENT_ID: &str = "1fc6de3e-8750-472e-baea-3ba22bb4eb56";
pub const DEFAULT_USER_AGENT: &str = "Bleemeo Rust Client";
pub const DEFAULT_THROTTLE_MAX_AUTO_RETRY_DELAY_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header scoping every request to a given account.
pub const ACCOUNT_HEADER: &str = "X-Bleemeo-Account";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API, without the `v1/` prefix.
    pub endpoint: String,
    pub oauth_client_id: String,
    pub oauth_client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Seed refresh token. When set, the client runs in refresh-only mode
    /// and never performs a password grant.
    pub initial_refresh_token: Option<String>,
    pub account_id: Option<String>,
    pub user_agent: String,
    /// Largest `Retry-After` delay the client waits out on its own.
    pub throttle_max_auto_retry_delay_secs: u64,
    pub timeout_secs: u64,
    /// Tokens are treated as expired this many seconds before their expiry.
    pub token_expiry_leeway_secs: u64,
    /// Headers added to every resource request.
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            oauth_client_id: DEFAULT_OAUTH_CLIENT_ID.to_string(),
            oauth_client_secret: None,
            username: None,
            password: None,
            initial_refresh_token: None,
            account_id: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            throttle_max_auto_retry_delay_secs: DEFAULT_THROTTLE_MAX_AUTO_RETRY_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_expiry_leeway_secs: 0,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Configuration using the given username and password.
    #[must_use]
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Configuration running in refresh-only mode from a seed refresh token.
    #[must_use]
    pub fn with_refresh_token(refresh_token: impl Into<String>) -> Self {
        Self {
            initial_refresh_token: Some(refresh_token.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn oauth_client(mut self, id: impl Into<String>, secret: Option<String>) -> Self {
        self.oauth_client_id = id.into();
        self.oauth_client_secret = secret;
        self
    }

    #[must_use]
    pub fn throttle_max_auto_retry_delay(&self) -> Duration {
        Duration::from_secs(self.throttle_max_auto_retry_delay_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn token_expiry_leeway(&self) -> Duration {
        Duration::from_secs(self.token_expiry_leeway_secs)
    }

    /// Seed refresh token, ignoring empty values.
    #[must_use]
    pub fn seed_refresh_token(&self) -> Option<&str> {
        non_empty(self.initial_refresh_token.as_deref())
    }

    /// Non-empty username.
    #[must_use]
    pub fn login(&self) -> Option<&str> {
        non_empty(self.username.as_deref())
    }

    /// Client secret, ignoring empty values.
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        non_empty(self.oauth_client_secret.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// Secrets never reach log output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("oauth_client_id", &self.oauth_client_id)
            .field("oauth_client_secret", &redact(self.oauth_client_secret.as_ref()))
            .field("username", &self.username)
            .field("password", &redact(self.password.as_ref()))
            .field("initial_refresh_token", &redact(self.initial_refresh_token.as_ref()))
            .field("account_id", &self.account_id)
            .field("user_agent", &self.user_agent)
            .field("throttle_max_auto_retry_delay_secs", &self.throttle_max_auto_retry_delay_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("token_expiry_leeway_secs", &self.token_expiry_leeway_secs)
            .field("extra_headers", &self.extra_headers)
            .finish()
    }
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_api() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "https://api.bleemeo.com");
        assert_eq!(config.oauth_client_id, DEFAULT_OAUTH_CLIENT_ID);
        assert_eq!(config.throttle_max_auto_retry_delay(), Duration::from_secs(60));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.login().is_none());
        assert!(config.seed_refresh_token().is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"username": "ops@example.com", "timeout_secs": 5}"#).unwrap();

        assert_eq!(config.login(), Some("ops@example.com"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn empty_strings_are_ignored() {
        let config = ClientConfig {
            initial_refresh_token: Some(String::new()),
            oauth_client_secret: Some(String::new()),
            ..ClientConfig::with_credentials("", "pw")
        };

        assert!(config.seed_refresh_token().is_none());
        assert!(config.client_secret().is_none());
        assert!(config.login().is_none());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = ClientConfig::with_credentials("user", "hunter2")
            .oauth_client("id", Some("s3cr3t".to_string()));

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("user"));
    }
}
