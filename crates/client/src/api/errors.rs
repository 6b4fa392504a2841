//! API-specific error types
//!
//! [`ApiError`] is the single error type returned by the client. Errors
//! derived from an HTTP response carry a [`ResponseDetails`] with the request
//! path, status, content type and the start of the body.

use std::fmt;
use std::time::Duration;

use bleemeo_common::auth::TokenError;
use bleemeo_common::{ErrorClassification, ErrorSeverity};
use reqwest::StatusCode;
use thiserror::Error;

pub use bleemeo_common::auth::ERROR_BODY_LIMIT;

/// What an HTTP error response looked like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDetails {
    /// Path of the request URL.
    pub path: String,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub message: String,
    /// The first MiB of the response body.
    pub body: Vec<u8>,
}

impl fmt::Display for ResponseDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.status.as_u16(), self.message)
    }
}

/// Payload whose JSON conversion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonDataKind {
    Details400,
    Details401,
    ResultPage,
    RequestBody,
    ResponseBody,
}

impl fmt::Display for JsonDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Details400 => "400 details",
            Self::Details401 => "401 details",
            Self::ResultPage => "result page",
            Self::RequestBody => "request body",
            Self::ResponseBody => "response body",
        };
        f.write_str(kind)
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct JsonError {
    pub kind: JsonDataKind,
    #[source]
    pub source: serde_json::Error,
    /// The bytes that failed to convert, empty when marshalling.
    pub data: Vec<u8>,
}

impl JsonError {
    pub fn new(kind: JsonDataKind, source: serde_json::Error, data: impl Into<Vec<u8>>) -> Self {
        Self { kind, source, data: data.into() }
    }
}

/// Generic 4xx/5xx failure
#[derive(Debug)]
pub struct StatusError {
    pub details: ResponseDetails,
    /// Set when the error body could not be decoded.
    pub cause: Option<JsonError>,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} (unmarshalling {cause})", self.details),
            None => write!(f, "{}", self.details),
        }
    }
}

/// Missing, invalid or rejected credentials
#[derive(Debug)]
pub struct AuthError {
    pub details: ResponseDetails,
    /// RFC 6749 `error` parameter, or the API's `code`.
    pub error_code: Option<String>,
    pub cause: Option<JsonError>,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "unmarshalling {cause}"),
            None => write!(f, "{}", self.details),
        }
    }
}

impl std::error::Error for StatusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|cause| cause as _)
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|cause| cause as _)
    }
}

/// The API asked us to slow down
#[derive(Debug, Error)]
#[error("{details} (retry in {}s)", .delay.as_secs())]
pub struct ThrottleError {
    pub details: ResponseDetails,
    pub delay: Duration,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Status(StatusError),

    #[error("authentication error: {0}")]
    Auth(AuthError),

    #[error("{0}")]
    Throttle(ThrottleError),

    #[error("{0} (resource not found: {path})", path = .0.path)]
    NotFound(ResponseDetails),

    #[error("marshalling {0}")]
    JsonMarshal(JsonError),

    #[error("unmarshalling {0}")]
    JsonUnmarshal(JsonError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("failed to retrieve authentication token: {0}")]
    TokenRetrieval(#[source] TokenError),

    #[error("failed to refetch token: {0}")]
    Refetch(#[source] Box<ApiError>),

    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("bad request URI {uri:?}: {source}")]
    InvalidUrl {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Rejected or missing credentials - needs new credentials
    Authentication,
    /// 429 - retry after the advertised delay
    RateLimit,
    /// 5xx - retryable
    Server,
    /// 4xx other than auth and throttling - non-retryable
    Client,
    /// 404 on a resource
    NotFound,
    /// JSON conversion of a payload
    Serialization,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

impl ApiError {
    /// Unwraps refetch wrappers down to the error that caused them.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Refetch(inner) => inner.root(),
            other => other,
        }
    }

    /// Response information, for errors built from an HTTP response.
    #[must_use]
    pub fn details(&self) -> Option<&ResponseDetails> {
        match self.root() {
            Self::Status(err) => Some(&err.details),
            Self::Auth(err) => Some(&err.details),
            Self::Throttle(err) => Some(&err.details),
            Self::NotFound(details) => Some(details),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.details().map(|details| details.status)
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self.root(), Self::Auth(_))
    }

    #[must_use]
    pub fn is_throttle(&self) -> bool {
        matches!(self.root(), Self::Throttle(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound(_))
    }

    /// Delay advertised by a 429 response.
    #[must_use]
    pub fn throttle_delay(&self) -> Option<Duration> {
        match self.root() {
            Self::Throttle(err) => Some(err.delay),
            _ => None,
        }
    }

    /// Server error code of an authentication failure.
    #[must_use]
    pub fn auth_error_code(&self) -> Option<&str> {
        match self.root() {
            Self::Auth(err) => err.error_code.as_deref(),
            _ => None,
        }
    }

    /// Get the error category for this error
    #[must_use]
    pub fn category(&self) -> ApiErrorCategory {
        match self.root() {
            Self::Auth(_) | Self::Token(_) | Self::TokenRetrieval(_) | Self::Refetch(_) => {
                ApiErrorCategory::Authentication
            }
            Self::Throttle(_) => ApiErrorCategory::RateLimit,
            Self::Status(err) if err.details.status.is_server_error() => ApiErrorCategory::Server,
            Self::Status(_) => ApiErrorCategory::Client,
            Self::NotFound(_) => ApiErrorCategory::NotFound,
            Self::JsonMarshal(_) | Self::JsonUnmarshal(_) => ApiErrorCategory::Serialization,
            Self::Transport { .. } => ApiErrorCategory::Network,
            Self::InvalidUrl { .. } | Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        match self.root() {
            Self::Token(err) | Self::TokenRetrieval(err) => err.is_retryable(),
            _ => matches!(
                self.category(),
                ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
            ),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self.root() {
            Self::Token(err) | Self::TokenRetrieval(err) => err.severity(),
            _ => match self.category() {
                ApiErrorCategory::NotFound => ErrorSeverity::Info,
                ApiErrorCategory::RateLimit | ApiErrorCategory::Network => ErrorSeverity::Warning,
                ApiErrorCategory::Authentication => ErrorSeverity::Critical,
                ApiErrorCategory::Server
                | ApiErrorCategory::Client
                | ApiErrorCategory::Serialization
                | ApiErrorCategory::Config => ErrorSeverity::Error,
            },
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        self.throttle_delay()
    }
}
