//! HTTP transport shared by the API client
//!
//! A thin wrapper over `reqwest` that owns the timeout and user agent and
//! knows how to consume response bodies so connections can be reused.

pub mod client;

pub use client::{drain, read_body_prefix, HttpClient, HttpClientBuilder};
