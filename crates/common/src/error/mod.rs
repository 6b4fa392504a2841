//! Error classification shared by the Bleemeo crates
//!
//! Every error type callers may need to react to implements
//! [`ErrorClassification`], giving them one interface to decide whether to
//! retry, back off, or give up:
//!
//! - **`is_retryable()`**: can the same operation succeed if attempted again?
//! - **`severity()`**: how loudly should this be reported?
//! - **`is_critical()`**: does this need a human (e.g. bad credentials)?
//! - **`retry_after()`**: server-suggested delay, such as `Retry-After`
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Resource not found |
//! | **Warning** | Transient, degraded | Rate limiting, network hiccups |
//! | **Error** | Failure requiring attention | Invalid request, bad response |
//! | **Critical** | Cannot proceed without intervention | Rejected credentials, no auth mean |

use std::fmt;
use std::time::Duration;

#[cfg(feature = "runtime")]
use crate::auth::{OAuthClientError, RevokeError, TokenError};

/// Standard interface for classifying errors
pub trait ErrorClassification {
    /// Check if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(feature = "runtime")]
fn is_transient_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[cfg(feature = "runtime")]
impl ErrorClassification for OAuthClientError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Request(err) => is_transient_transport(err),
            Self::Retrieve(err) => err.status.is_server_error(),
            Self::Parse(_) | Self::InvalidEndpoint(_) => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Request(_) => ErrorSeverity::Warning,
            Self::Retrieve(err) if err.status.is_server_error() => ErrorSeverity::Warning,
            Self::Retrieve(_) => ErrorSeverity::Critical,
            Self::Parse(_) | Self::InvalidEndpoint(_) => ErrorSeverity::Error,
        }
    }
}

#[cfg(feature = "runtime")]
impl ErrorClassification for TokenError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Refresh(err) | Self::OAuth(err) => err.is_retryable(),
            Self::Revoke(RevokeError::Request(err)) => is_transient_transport(err),
            Self::Revoke(RevokeError::Status(status)) => status.is_server_error(),
            Self::NoAuthMeanProvided | Self::TokenIsRefreshOnly | Self::TokenHasNoRefresh => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoAuthMeanProvided | Self::TokenIsRefreshOnly | Self::TokenHasNoRefresh => {
                ErrorSeverity::Critical
            }
            Self::Refresh(err) | Self::OAuth(err) => err.severity(),
            Self::Revoke(_) => ErrorSeverity::Warning,
        }
    }
}
