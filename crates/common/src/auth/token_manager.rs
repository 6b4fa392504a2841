//! Token provider
//!
//! Owns the current OAuth token and decides how to get a new one:
//! - Empty: first acquisition, by password grant or from the seed refresh
//!   token
//! - Valid: served from cache, no network call
//! - Expired: refresh grant, with a single password-grant fallback when
//!   credentials are configured
//! - Expired without refresh string: fails
//!
//! Every operation holds one async mutex for its whole duration, network
//! round-trip included, so two grants never run at the same time. Refresh
//! tokens are rotated by the server on use; concurrent refreshes would
//! invalidate each other.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::client::{OAuthClientError, RetrieveError, RevokeError};
use super::traits::GrantClient;
use super::types::{Token, TokenTypeHint};
use crate::time::{Clock, SystemClock};

/// Error type for token provider operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no authentication mean provided")]
    NoAuthMeanProvided,

    #[error("the OAuth token can only be refreshed")]
    TokenIsRefreshOnly,

    #[error("the OAuth token has no refresh")]
    TokenHasNoRefresh,

    #[error("token refresh failed: {0}")]
    Refresh(#[source] OAuthClientError),

    #[error("failed to revoke token: {0}")]
    Revoke(#[source] RevokeError),

    #[error(transparent)]
    OAuth(#[from] OAuthClientError),
}

impl TokenError {
    /// Server-side grant rejection behind this error, if any.
    #[must_use]
    pub const fn retrieve_error(&self) -> Option<&RetrieveError> {
        match self {
            Self::Refresh(err) | Self::OAuth(err) => err.retrieve_error(),
            _ => None,
        }
    }
}

/// How the provider may mint a brand-new token
#[derive(Clone, PartialEq, Eq)]
pub enum GrantMode {
    /// Password grant with these credentials.
    Credentials { username: String, password: String },
    /// Only refresh grants, starting from `seed`.
    RefreshOnly { seed: String },
}

impl GrantMode {
    /// Picks the grant mode from whatever was configured.
    ///
    /// A seed refresh token wins over credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::NoAuthMeanProvided`] when neither a username nor
    /// a seed refresh token is available.
    pub fn select(
        username: Option<&str>,
        password: Option<&str>,
        seed_refresh_token: Option<&str>,
    ) -> Result<Self, TokenError> {
        if let Some(seed) = seed_refresh_token.filter(|s| !s.is_empty()) {
            return Ok(Self::RefreshOnly { seed: seed.to_string() });
        }

        match username.filter(|u| !u.is_empty()) {
            Some(username) => Ok(Self::Credentials {
                username: username.to_string(),
                password: password.unwrap_or_default().to_string(),
            }),
            None => Err(TokenError::NoAuthMeanProvided),
        }
    }

    #[must_use]
    pub const fn is_refresh_only(&self) -> bool {
        matches!(self, Self::RefreshOnly { .. })
    }
}

impl fmt::Debug for GrantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials { username, .. } => {
                f.debug_struct("Credentials").field("username", username).finish_non_exhaustive()
            }
            Self::RefreshOnly { .. } => f.debug_struct("RefreshOnly").finish_non_exhaustive(),
        }
    }
}

/// Invoked with every newly acquired token, never on cache hits.
pub type NewTokenCallback = Arc<dyn Fn(&Token) + Send + Sync>;

/// Caches and renews the bearer token of one API client
pub struct TokenProvider<C: GrantClient> {
    client: C,
    mode: GrantMode,
    clock: Arc<dyn Clock>,
    leeway: Duration,
    token: Mutex<Option<Token>>,
    on_new_token: Option<NewTokenCallback>,
}

impl<C: GrantClient> TokenProvider<C> {
    #[must_use]
    pub fn new(client: C, mode: GrantMode) -> Self {
        Self {
            client,
            mode,
            clock: Arc::new(SystemClock),
            leeway: Duration::ZERO,
            token: Mutex::new(None),
            on_new_token: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Treat tokens as expired `leeway` before their actual expiry.
    #[must_use]
    pub const fn with_expiry_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    #[must_use]
    pub fn on_new_token(mut self, callback: NewTokenCallback) -> Self {
        self.on_new_token = Some(callback);
        self
    }

    /// Snapshot of the cached token, without any network call.
    pub async fn cached_token(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    /// Returns a valid token, acquiring or refreshing it when needed.
    ///
    /// # Errors
    ///
    /// - [`TokenError::TokenHasNoRefresh`] when the cached token expired and
    ///   carries no refresh string
    /// - [`TokenError::Refresh`] when a refresh failed in refresh-only mode
    /// - [`TokenError::OAuth`] when a grant failed
    #[instrument(skip(self))]
    pub async fn token(&self) -> Result<Token, TokenError> {
        let mut cached = self.token.lock().await;

        let fresh = match cached.as_ref() {
            None => self.initial_grant().await?,
            Some(current) if current.is_valid_at(self.clock.now(), self.leeway) => {
                debug!("using cached token");
                return Ok(current.clone());
            }
            Some(current) => {
                let refresh = current.refresh_token().ok_or(TokenError::TokenHasNoRefresh)?;
                self.refresh_or_fallback(refresh).await?
            }
        };

        *cached = Some(fresh.clone());
        self.notify(&fresh);

        Ok(fresh)
    }

    /// Forces a brand-new password grant, whatever the cache state.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TokenIsRefreshOnly`] without any network call
    /// when no credentials are configured, or [`TokenError::OAuth`] when the
    /// grant fails. On failure the cached token is left untouched.
    #[instrument(skip(self))]
    pub async fn refetch_token(&self) -> Result<Token, TokenError> {
        let GrantMode::Credentials { username, password } = &self.mode else {
            return Err(TokenError::TokenIsRefreshOnly);
        };

        let mut cached = self.token.lock().await;
        let fresh = self.password_grant(username, password).await?;
        info!("token refetched with a password grant");

        *cached = Some(fresh.clone());
        self.notify(&fresh);

        Ok(fresh)
    }

    /// Revokes the cached token and clears the cache.
    ///
    /// Succeeds without any network call when no valid token is cached. A
    /// token without refresh string has its access token revoked instead.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Revoke`] when the revocation fails; the cached
    /// token is kept in that case.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), TokenError> {
        let mut cached = self.token.lock().await;

        let Some(current) =
            cached.as_ref().filter(|token| token.is_valid_at(self.clock.now(), self.leeway))
        else {
            debug!("no valid token to revoke");
            return Ok(());
        };

        let (value, hint) = match current.refresh_token() {
            Some(refresh) => (refresh, TokenTypeHint::RefreshToken),
            None => (current.access_token(), TokenTypeHint::AccessToken),
        };

        self.client.revoke(value, hint).await.map_err(TokenError::Revoke)?;

        *cached = None;
        info!("logged out, token revoked");

        Ok(())
    }

    async fn initial_grant(&self) -> Result<Token, TokenError> {
        match &self.mode {
            GrantMode::Credentials { username, password } => {
                let token = self.password_grant(username, password).await?;
                info!("token acquired with a password grant");
                Ok(token)
            }
            GrantMode::RefreshOnly { seed } => {
                let token = self.refresh_grant(seed).await.map_err(TokenError::Refresh)?;
                info!("token acquired from the seed refresh token");
                Ok(token)
            }
        }
    }

    async fn refresh_or_fallback(&self, refresh: &str) -> Result<Token, TokenError> {
        match self.refresh_grant(refresh).await {
            Ok(token) => {
                info!("token refreshed");
                Ok(token)
            }
            Err(err) => match &self.mode {
                GrantMode::RefreshOnly { .. } => Err(TokenError::Refresh(err)),
                GrantMode::Credentials { username, password } => {
                    warn!(error = %err, "token refresh failed, falling back to a password grant");
                    let token = self.password_grant(username, password).await?;
                    info!("token acquired with a password grant");
                    Ok(token)
                }
            },
        }
    }

    async fn password_grant(&self, username: &str, password: &str) -> Result<Token, OAuthClientError> {
        let response = self.client.password_grant(username, password).await?;
        Ok(Token::from_response(response, self.clock.now()))
    }

    async fn refresh_grant(&self, refresh: &str) -> Result<Token, OAuthClientError> {
        let response = self.client.refresh_grant(refresh).await?;
        Ok(Token::from_response(response, self.clock.now()).or_refresh(refresh))
    }

    fn notify(&self, token: &Token) {
        if let Some(callback) = &self.on_new_token {
            callback(token);
        }
    }
}

impl<C: GrantClient> fmt::Debug for TokenProvider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("mode", &self.mode)
            .field("leeway", &self.leeway)
            .field("has_callback", &self.on_new_token.is_some())
            .finish_non_exhaustive()
    }
}
