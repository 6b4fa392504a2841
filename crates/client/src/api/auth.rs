//! Bearer token injection
//!
//! [`AuthInjector`] asks the token provider for a valid token and attaches
//! it to outgoing requests. Grant rejections reported by the authorization
//! server surface as [`ApiError::Auth`] so callers can tell bad credentials
//! apart from transport trouble.

use std::sync::Arc;

use async_trait::async_trait;
use bleemeo_common::auth::{GrantClient, RetrieveError, Token, TokenError, TokenProvider};
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use tracing::debug;

use super::errors::{ApiError, AuthError, ResponseDetails};

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid token, acquiring or refreshing it if needed.
    async fn token(&self) -> Result<Token, TokenError>;

    /// Get a brand-new token from the credentials, whatever the cache holds.
    async fn refetch_token(&self) -> Result<Token, TokenError>;

    /// Revoke the current token.
    async fn logout(&self) -> Result<(), TokenError>;
}

#[async_trait]
impl<C: GrantClient + 'static> AccessTokenProvider for TokenProvider<C> {
    async fn token(&self) -> Result<Token, TokenError> {
        TokenProvider::token(self).await
    }

    async fn refetch_token(&self) -> Result<Token, TokenError> {
        TokenProvider::refetch_token(self).await
    }

    async fn logout(&self) -> Result<(), TokenError> {
        TokenProvider::logout(self).await
    }
}

/// Attaches `Authorization: Bearer <token>` to requests
#[derive(Clone)]
pub struct AuthInjector {
    provider: Arc<dyn AccessTokenProvider>,
}

impl AuthInjector {
    pub fn new(provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn AccessTokenProvider> {
        &self.provider
    }

    /// Adds the authorization header for a request to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] when the authorization server rejected the
    /// grant, [`ApiError::TokenRetrieval`] for any other provider failure.
    pub async fn inject(&self, request: RequestBuilder, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.provider.token().await.map_err(|err| match err.retrieve_error() {
            Some(rejection) => auth_error(rejection, path),
            None => ApiError::TokenRetrieval(err),
        })?;

        debug!(path, "authorization header attached");
        Ok(request.header(AUTHORIZATION, token.authorization_value()))
    }

    /// Replaces the cached token with a fresh password grant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Refetch`] wrapping the reason.
    pub async fn refetch(&self, path: &str) -> Result<(), ApiError> {
        self.provider.refetch_token().await.map(drop).map_err(|err| {
            let inner = match err.retrieve_error() {
                Some(rejection) => auth_error(rejection, path),
                None => ApiError::Token(err),
            };
            ApiError::Refetch(Box::new(inner))
        })
    }
}

fn auth_error(rejection: &RetrieveError, path: &str) -> ApiError {
    let message = rejection
        .error_description
        .clone()
        .or_else(|| rejection.error_code.clone())
        .unwrap_or_else(|| rejection.status.to_string());

    ApiError::Auth(AuthError {
        details: ResponseDetails {
            path: path.to_string(),
            status: rejection.status,
            content_type: rejection.content_type.clone(),
            message,
            body: rejection.body.clone(),
        },
        error_code: rejection.error_code.clone(),
        cause: None,
    })
}
