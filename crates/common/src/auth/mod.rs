//! OAuth 2.0 token lifecycle for the Bleemeo API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenProvider  │  Cache + state machine, one mutex per instance
//! └────────┬────────┘
//!          │
//!          └──► GrantClient (trait)
//!                    │
//!                    └──► OAuthClient   (password / refresh grants, revoke)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use bleemeo_common::auth::{GrantMode, OAuthClient, TokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = reqwest::Client::new();
//!     let oauth = OAuthClient::new(http, "https://api.bleemeo.com", "client-id")?;
//!     let mode = GrantMode::select(Some("user@example.com"), Some("password"), None)?;
//!
//!     let provider = TokenProvider::new(oauth, mode);
//!     let token = provider.token().await?;
//!     println!("Authorization: {}", token.authorization_value());
//!
//!     provider.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `Token`, grant wire types
//! - **[`client`]**: HTTP client for the token and revocation endpoints
//! - **[`traits`]**: `GrantClient` seam
//! - **[`token_manager`]**: `TokenProvider`

pub mod client;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::{
    read_body_prefix, OAuthClient, OAuthClientError, RetrieveError, RevokeError, ERROR_BODY_LIMIT,
    REVOKE_PATH, TOKEN_PATH,
};
pub use token_manager::{GrantMode, NewTokenCallback, TokenError, TokenProvider};
pub use traits::GrantClient;
pub use types::{OAuthErrorBody, Token, TokenResponse, TokenTypeHint};
