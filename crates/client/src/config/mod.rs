//! Configuration loading
//!
//! Builds a [`bleemeo_domain::ClientConfig`] from environment variables and
//! configuration files.

pub mod loader;

pub use loader::{apply_env, load, load_from_env, load_from_file, probe_config_paths};
