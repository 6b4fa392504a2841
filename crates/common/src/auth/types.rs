//! Token data and grant wire types.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Successful response of the token endpoint (RFC 6749 section 5.1).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Error body of the token endpoint (RFC 6749 section 5.2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

/// What a revocation request carries in its `token` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTypeHint {
    RefreshToken,
    AccessToken,
}

impl TokenTypeHint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RefreshToken => "refresh_token",
            Self::AccessToken => "access_token",
        }
    }
}

impl fmt::Display for TokenTypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An access/refresh token pair with its expiry
///
/// A `Token` is immutable once built: every refresh produces a new value.
/// A token without `expires_at` never expires.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    token_type: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    scope: Option<String>,
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            refresh_token: refresh_token.filter(|r| !r.is_empty()),
            expires_at,
            scope: None,
        }
    }

    /// Builds a token from a grant response received at `issued_at`.
    ///
    /// A non-positive or missing `expires_in` yields a token without expiry.
    /// An `expires_in` past the representable range saturates to
    /// [`DateTime::<Utc>::MAX_UTC`].
    #[must_use]
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let expires_at = response.expires_in.filter(|secs| *secs > 0).map(|secs| {
            chrono::Duration::try_seconds(secs)
                .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        });

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token.filter(|r| !r.is_empty()),
            expires_at,
            scope: response.scope,
        }
    }

    /// Keeps `previous` as refresh token when the server did not rotate it.
    #[must_use]
    pub fn or_refresh(mut self, previous: &str) -> Self {
        if self.refresh_token.is_none() && !previous.is_empty() {
            self.refresh_token = Some(previous.to_string());
        }
        self
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token can still be used at `now`.
    ///
    /// `leeway` shortens the validity window to absorb clock skew.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        if self.access_token.is_empty() {
            return false;
        }

        match self.expires_at {
            None => true,
            Some(expiry) => {
                let leeway = chrono::Duration::from_std(leeway).unwrap_or(chrono::Duration::MAX);
                now < expiry.checked_sub_signed(leeway).unwrap_or(DateTime::<Utc>::MIN_UTC)
            }
        }
    }

    /// Normalised token type, `Bearer` unless the server said otherwise.
    #[must_use]
    pub fn token_type(&self) -> &str {
        if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer") {
            "Bearer"
        } else {
            &self.token_type
        }
    }

    /// Value of the `Authorization` header for this token.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type(), self.access_token)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token_type", &self.token_type())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn response(expires_in: Option<i64>, refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "a-1".to_string(),
            token_type: "bearer".to_string(),
            expires_in,
            refresh_token: refresh.map(str::to_string),
            scope: None,
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn expiry_is_computed_from_issue_time() {
        let token = Token::from_response(response(Some(3600), Some("r-1")), epoch());

        assert_eq!(token.expires_at(), Some(epoch() + chrono::Duration::hours(1)));
        assert!(token.is_valid_at(epoch() + chrono::Duration::minutes(59), Duration::ZERO));
        assert!(!token.is_valid_at(epoch() + chrono::Duration::hours(1), Duration::ZERO));
    }

    #[test]
    fn leeway_shortens_validity() {
        let token = Token::from_response(response(Some(60), None), epoch());
        let now = epoch() + chrono::Duration::seconds(55);

        assert!(token.is_valid_at(now, Duration::ZERO));
        assert!(!token.is_valid_at(now, Duration::from_secs(10)));
    }

    #[test]
    fn missing_expiry_never_expires() {
        let token = Token::from_response(response(None, None), epoch());
        assert!(token.is_valid_at(epoch() + chrono::Duration::days(3650), Duration::ZERO));

        let token = Token::from_response(response(Some(0), None), epoch());
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn huge_expiry_saturates() {
        let token = Token::from_response(response(Some(i64::MAX / 2), Some("r-1")), epoch());
        assert_eq!(token.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(token.is_valid_at(epoch() + chrono::Duration::days(36500), Duration::from_secs(60)));

        let token = Token::from_response(response(Some(i64::MAX), None), DateTime::<Utc>::MAX_UTC);
        assert_eq!(token.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn empty_refresh_is_absent() {
        let token = Token::from_response(response(Some(10), Some("")), epoch());
        assert!(token.refresh_token().is_none());
    }

    #[test]
    fn unrotated_refresh_is_carried_over() {
        let token = Token::from_response(response(Some(10), None), epoch()).or_refresh("r-1");
        assert_eq!(token.refresh_token(), Some("r-1"));

        let token = Token::from_response(response(Some(10), Some("r-2")), epoch()).or_refresh("r-1");
        assert_eq!(token.refresh_token(), Some("r-2"));
    }

    #[test]
    fn authorization_value_normalises_type() {
        let token = Token::from_response(response(None, None), epoch());
        assert_eq!(token.authorization_value(), "Bearer a-1");
    }

    #[test]
    fn debug_hides_secrets() {
        let token = Token::new("secret-access", Some("secret-refresh".to_string()), None);
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
