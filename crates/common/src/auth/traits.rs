//! Seam between the token lifecycle and the authorization server
//!
//! `TokenProvider` only talks to the server through [`GrantClient`], so
//! tests can drive it with a mock instead of a live endpoint.

use async_trait::async_trait;

use super::client::{OAuthClientError, RevokeError};
use super::types::{TokenResponse, TokenTypeHint};

/// Grant and revocation operations against an OAuth 2.0 server
#[async_trait]
pub trait GrantClient: Send + Sync {
    /// Password grant (`grant_type=password`)
    ///
    /// # Errors
    /// Returns error on transport failure, server rejection or bad response
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, OAuthClientError>;

    /// Refresh grant (`grant_type=refresh_token`)
    ///
    /// # Errors
    /// Returns error on transport failure, server rejection or bad response
    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenResponse, OAuthClientError>;

    /// Token revocation
    ///
    /// # Errors
    /// Returns error on transport failure or any non-200 reply
    async fn revoke(&self, token: &str, hint: TokenTypeHint) -> Result<(), RevokeError>;
}
