//! HTTP client for the token and revocation endpoints
//!
//! Talks form-encoded OAuth 2.0 to `{endpoint}/o/token/` (password and
//! refresh grants) and `{endpoint}/o/revoke_token/`. Client credentials are
//! always sent in the form body.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::traits::GrantClient;
use super::types::{OAuthErrorBody, TokenResponse, TokenTypeHint};

pub const TOKEN_PATH: &str = "/o/token/";
pub const REVOKE_PATH: &str = "/o/revoke_token/";

/// Longest error body kept for diagnostics (1 MiB).
pub const ERROR_BODY_LIMIT: usize = 1 << 20;

/// A grant the token endpoint refused
#[derive(Debug, Clone)]
pub struct RetrieveError {
    pub status: StatusCode,
    pub content_type: Option<String>,
    /// RFC 6749 `error` parameter.
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub error_uri: Option<String>,
    /// Start of the raw response body.
    pub body: Vec<u8>,
}

impl std::fmt::Display for RetrieveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.error_code, &self.error_description) {
            (Some(code), Some(description)) => {
                write!(f, "token endpoint rejected the grant: {code}: {description}")
            }
            (Some(code), None) => write!(f, "token endpoint rejected the grant: {code}"),
            _ => write!(f, "cannot fetch token: {}", self.status),
        }
    }
}

impl std::error::Error for RetrieveError {}

/// Error type for grant exchanges
#[derive(Debug, thiserror::Error)]
pub enum OAuthClientError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Retrieve(RetrieveError),

    #[error("cannot parse token response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("invalid OAuth endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl OAuthClientError {
    /// The server-side rejection, if that is what this error is.
    #[must_use]
    pub const fn retrieve_error(&self) -> Option<&RetrieveError> {
        match self {
            Self::Retrieve(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RevokeError {
    #[error("server replied with status code {0}")]
    Status(StatusCode),

    #[error("revocation request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// OAuth 2.0 client for the Bleemeo authorization server
///
/// Holds the HTTP transport it was given; it never builds its own.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    token_url: Url,
    revoke_url: Url,
    client_id: String,
    client_secret: Option<String>,
    user_agent: Option<String>,
}

impl OAuthClient {
    /// Creates a client for the authorization server at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthClientError::InvalidEndpoint`] if the endpoint does not
    /// form valid token URLs.
    pub fn new(
        http: Client,
        endpoint: &str,
        client_id: impl Into<String>,
    ) -> Result<Self, OAuthClientError> {
        let base = endpoint.trim_end_matches('/');

        Ok(Self {
            http,
            token_url: Url::parse(&format!("{base}{TOKEN_PATH}"))?,
            revoke_url: Url::parse(&format!("{base}{REVOKE_PATH}"))?,
            client_id: client_id.into(),
            client_secret: None,
            user_agent: None,
        })
    }

    #[must_use]
    pub fn with_client_secret(mut self, secret: Option<String>) -> Self {
        self.client_secret = secret.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub const fn token_url(&self) -> &Url {
        &self.token_url
    }

    fn with_client_credentials<'a>(&'a self, params: &mut Vec<(&'static str, &'a str)>) {
        params.push(("client_id", &self.client_id));
        if let Some(secret) = &self.client_secret {
            params.push(("client_secret", secret));
        }
    }

    fn post(&self, url: &Url) -> reqwest::RequestBuilder {
        let request = self.http.post(url.clone());
        match &self.user_agent {
            Some(agent) => request.header(USER_AGENT, agent),
            None => request,
        }
    }

    async fn exchange(
        &self,
        params: &[(&'static str, &str)],
    ) -> Result<TokenResponse, OAuthClientError> {
        let response = self.post(&self.token_url).form(params).send().await?;
        let status = response.status();
        debug!(%status, "token endpoint replied");

        if !status.is_success() {
            return Err(OAuthClientError::Retrieve(retrieve_error(response).await));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(OAuthClientError::Parse)
    }

    /// Exchanges a username and password for a token.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, server rejections and unparseable bodies.
    #[instrument(skip_all)]
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        let mut params =
            vec![("grant_type", "password"), ("username", username), ("password", password)];
        self.with_client_credentials(&mut params);

        self.exchange(&params).await
    }

    /// Exchanges a refresh token for a new token.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, server rejections and unparseable bodies.
    #[instrument(skip_all)]
    pub async fn refresh_grant(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        let mut params = vec![("grant_type", "refresh_token"), ("refresh_token", refresh_token)];
        self.with_client_credentials(&mut params);

        self.exchange(&params).await
    }

    /// Revokes `token`. Revoking a refresh token also revokes its access
    /// token server-side.
    ///
    /// # Errors
    ///
    /// Returns [`RevokeError::Status`] for any reply other than 200.
    #[instrument(skip_all, fields(hint = %hint))]
    pub async fn revoke(&self, token: &str, hint: TokenTypeHint) -> Result<(), RevokeError> {
        let mut params = vec![("token_type_hint", hint.as_str()), ("token", token)];
        self.with_client_credentials(&mut params);

        let response = self.post(&self.revoke_url).form(&params).send().await?;
        let status = response.status();
        // Drain so the connection goes back to the pool.
        let _ = response.bytes().await;

        if status != StatusCode::OK {
            return Err(RevokeError::Status(status));
        }

        debug!("token revoked");
        Ok(())
    }
}

/// Read at most `limit` bytes of the body, then drain the rest.
///
/// Read errors end the body early; whatever was read is kept.
pub async fn read_body_prefix(mut response: reqwest::Response, limit: usize) -> Vec<u8> {
    let mut prefix = Vec::new();

    while let Ok(Some(chunk)) = response.chunk().await {
        let room = limit.saturating_sub(prefix.len());
        if room == 0 {
            continue;
        }
        prefix.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    prefix
}

async fn retrieve_error(response: reqwest::Response) -> RetrieveError {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = read_body_prefix(response, ERROR_BODY_LIMIT).await;

    let parsed: OAuthErrorBody = serde_json::from_slice(&body).unwrap_or_default();

    RetrieveError {
        status,
        content_type,
        error_code: parsed.error.filter(|e| !e.is_empty()),
        error_description: parsed.error_description.filter(|d| !d.is_empty()),
        error_uri: parsed.error_uri,
        body,
    }
}

#[async_trait]
impl GrantClient for OAuthClient {
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.password_grant(username, password).await
    }

    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenResponse, OAuthClientError> {
        self.refresh_grant(refresh_token).await
    }

    async fn revoke(&self, token: &str, hint: TokenTypeHint) -> Result<(), RevokeError> {
        self.revoke(token, hint).await
    }
}
