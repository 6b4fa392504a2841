//! Bleemeo API client
//!
//! # Architecture
//!
//! ```text
//! ApiClient ── request() ── one throttle auto-retry
//!     │
//!     └── execute() ── ThrottleGate (pending 429 deadline)
//!             │
//!             ├── AuthInjector ── AccessTokenProvider (TokenProvider)
//!             ├── HttpClient (single attempt)
//!             └── status classification into ApiError
//! ```
//!
//! A 401 on an authenticated request triggers one token refetch and one
//! resend; a 429 records a deadline shared by every request of the client.

pub mod auth;
pub mod client;
pub mod errors;
pub mod iterator;
pub mod throttle;

pub use auth::{AccessTokenProvider, AuthInjector};
pub use client::{json_body, ApiClient, ApiClientBuilder, ApiResponse};
pub use errors::{
    ApiError, ApiErrorCategory, AuthError, JsonDataKind, JsonError, ResponseDetails, StatusError,
    ThrottleError, ERROR_BODY_LIMIT,
};
pub use iterator::ResourceIterator;
pub use throttle::{parse_retry_after, ThrottleGate, DEFAULT_THROTTLE_DELAY, MAX_THROTTLE_DELAY};
