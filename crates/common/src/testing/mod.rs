//! Testing utilities and helpers
//!
//! - **[`mocks`]**: scripted `GrantClient` implementation
//! - **[`time`]**: controllable clock
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use bleemeo_common::auth::{GrantMode, TokenProvider};
//! use bleemeo_common::testing::{MockClock, MockGrantClient};
//!
//! let clock = MockClock::new();
//! let provider = TokenProvider::new(
//!     MockGrantClient::new().with_token("a-1", Some("r-1"), 3600),
//!     GrantMode::Credentials { username: "user".into(), password: "pass".into() },
//! )
//! .with_clock(Arc::new(clock.clone()));
//!
//! clock.advance(Duration::from_secs(3600));
//! # drop(provider);
//! ```

pub mod mocks;
pub mod time;

pub use mocks::{rejection, MockGrantClient};
pub use time::MockClock;
