//! # Bleemeo Domain
//!
//! Plain data shared by the Bleemeo API client crates.
//!
//! This crate contains:
//! - The resource table (`Resource`) and the enum tables carried in payloads
//! - Request/response value types (`Params`, `Body`, `ResultsPage`)
//! - The client configuration structure
//!
//! ## Architecture
//! - No dependencies on other Bleemeo crates
//! - No I/O

pub mod config;
pub mod enums;
pub mod macros;
pub mod resources;
pub mod types;

pub use config::{ClientConfig, ACCOUNT_HEADER};
pub use enums::*;
pub use resources::Resource;
pub use types::{make_body_from, Body, BodyError, Fields, Params, ResultsPage};
