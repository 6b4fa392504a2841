//! # Bleemeo API client
//!
//! Typed access to the Bleemeo REST API.
//!
//! This crate contains:
//! - The request executor with OAuth bearer authentication, a single token
//!   refetch on 401 and `Retry-After` handling on 429
//! - Resource operations (get, list, iterate, create, update, delete)
//! - Configuration loading from the environment and files
//!
//! ```no_run
//! use bleemeo_client::{config, ApiClient};
//! use bleemeo_domain::{Params, Resource};
//!
//! # async fn run() -> Result<(), bleemeo_client::ApiError> {
//! let client = ApiClient::builder().config(config::load_from_env()?).build()?;
//!
//! let mut metrics = client.iterator(Resource::Metric, Params::new());
//! while let Some(metric) = metrics.try_next().await? {
//!     println!("{}", metric["label"]);
//! }
//!
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod http;

pub use api::{ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, ApiResponse, ResourceIterator};
pub use http::HttpClient;
