//! Mock implementations of common traits
//!
//! Provides mock objects for testing purposes.

#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::json;

use crate::auth::{
    GrantClient, OAuthClientError, RetrieveError, RevokeError, TokenResponse, TokenTypeHint,
};

#[derive(Debug, Clone)]
enum GrantOutcome {
    Token(TokenResponse),
    Reject(String),
}

#[derive(Debug, Default)]
struct GrantLog {
    outcomes: VecDeque<GrantOutcome>,
    password_grants: usize,
    refreshed_with: Vec<String>,
    revocations: Vec<(String, TokenTypeHint)>,
}

/// Scripted grant client
///
/// Grants (password or refresh) consume the scripted outcomes in order. An
/// exhausted script rejects with `unscripted_grant`. Clones share the script
/// and the call log.
///
/// # Examples
///
/// ```
/// use bleemeo_common::testing::MockGrantClient;
///
/// let client = MockGrantClient::new()
///     .with_token("a-1", Some("r-1"), 3600)
///     .with_rejection("invalid_grant");
/// assert_eq!(client.password_grants(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockGrantClient {
    log: Arc<Mutex<GrantLog>>,
    delay: Option<Duration>,
    failing_revocation: bool,
}

impl MockGrantClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful grant.
    #[must_use]
    pub fn with_token(self, access: &str, refresh: Option<&str>, expires_in: i64) -> Self {
        self.log.lock().outcomes.push_back(GrantOutcome::Token(TokenResponse {
            access_token: access.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(expires_in),
            refresh_token: refresh.map(str::to_string),
            scope: None,
        }));
        self
    }

    /// Queue a grant rejected with the given RFC 6749 error code.
    #[must_use]
    pub fn with_rejection(self, error_code: &str) -> Self {
        self.log.lock().outcomes.push_back(GrantOutcome::Reject(error_code.to_string()));
        self
    }

    /// Delay every grant, to widen race windows.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every revocation fail with a 400.
    #[must_use]
    pub const fn failing_revocation(mut self) -> Self {
        self.failing_revocation = true;
        self
    }

    #[must_use]
    pub fn password_grants(&self) -> usize {
        self.log.lock().password_grants
    }

    #[must_use]
    pub fn refresh_grants(&self) -> usize {
        self.log.lock().refreshed_with.len()
    }

    /// Refresh strings used, in call order.
    #[must_use]
    pub fn refreshed_with(&self) -> Vec<String> {
        self.log.lock().refreshed_with.clone()
    }

    #[must_use]
    pub fn revocations(&self) -> Vec<(String, TokenTypeHint)> {
        self.log.lock().revocations.clone()
    }

    async fn next_outcome(&self) -> Result<TokenResponse, OAuthClientError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.log.lock().outcomes.pop_front();
        match outcome {
            Some(GrantOutcome::Token(response)) => Ok(response),
            Some(GrantOutcome::Reject(code)) => Err(rejection(&code)),
            None => Err(rejection("unscripted_grant")),
        }
    }
}

/// A `RetrieveError` as the token endpoint would produce it.
#[must_use]
pub fn rejection(error_code: &str) -> OAuthClientError {
    let body = json!({"error": error_code, "error_description": "rejected by mock"});

    OAuthClientError::Retrieve(RetrieveError {
        status: StatusCode::BAD_REQUEST,
        content_type: Some("application/json".to_string()),
        error_code: Some(error_code.to_string()),
        error_description: Some("rejected by mock".to_string()),
        error_uri: None,
        body: body.to_string().into_bytes(),
    })
}

#[async_trait]
impl GrantClient for MockGrantClient {
    async fn password_grant(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.log.lock().password_grants += 1;
        self.next_outcome().await
    }

    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenResponse, OAuthClientError> {
        self.log.lock().refreshed_with.push(refresh_token.to_string());
        self.next_outcome().await
    }

    async fn revoke(&self, token: &str, hint: TokenTypeHint) -> Result<(), RevokeError> {
        if self.failing_revocation {
            return Err(RevokeError::Status(StatusCode::BAD_REQUEST));
        }

        self.log.lock().revocations.push((token.to_string(), hint));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_is_consumed_in_order() {
        let client = MockGrantClient::new().with_token("a-1", None, 10).with_rejection("nope");

        let first = client.password_grant("u", "p").await.unwrap();
        assert_eq!(first.access_token, "a-1");

        let second = client.refresh_grant("r").await.unwrap_err();
        assert_eq!(second.retrieve_error().unwrap().error_code.as_deref(), Some("nope"));

        let third = client.password_grant("u", "p").await.unwrap_err();
        assert_eq!(
            third.retrieve_error().unwrap().error_code.as_deref(),
            Some("unscripted_grant")
        );

        assert_eq!(client.password_grants(), 2);
        assert_eq!(client.refreshed_with(), vec!["r".to_string()]);
    }
}
