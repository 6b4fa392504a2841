//! Time abstractions
//!
//! - **[`clock`]**: the `Clock` trait and the real `SystemClock`
//!
//! The controllable `MockClock` lives in `testing` (feature `test-utils`).

pub mod clock;

pub use clock::{Clock, SystemClock};
