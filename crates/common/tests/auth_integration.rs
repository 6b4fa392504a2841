//! Integration tests for auth module
//!
//! Drives `TokenProvider` over a real `OAuthClient` against a mock
//! authorization server.

#![cfg(feature = "test-utils")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bleemeo_common::auth::{GrantMode, OAuthClient, Token, TokenError, TokenProvider};
use bleemeo_common::testing::MockClock;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_body(access: &str, refresh: &str, expires_in: i64) -> serde_json::Value {
    json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "refresh_token": refresh,
        "scope": "read write"
    })
}

fn provider(server: &MockServer, mode: GrantMode, clock: &MockClock) -> TokenProvider<OAuthClient> {
    let oauth = OAuthClient::new(reqwest::Client::new(), &server.uri(), "test-client").unwrap();
    TokenProvider::new(oauth, mode).with_clock(Arc::new(clock.clone()))
}

fn credentials() -> GrantMode {
    GrantMode::Credentials { username: "user".to_string(), password: "pass".to_string() }
}

/// Validates the full acquire / expire / refresh cycle.
///
/// # Test Steps
/// 1. Password grant returns a-1/r-1 valid one hour
/// 2. One hour later the token is expired
/// 3. The provider refreshes with r-1 and gets a-2/r-2
/// 4. Exactly two token endpoint calls happen
#[tokio::test]
async fn test_password_then_refresh_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a-1", "r-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a-2", "r-2", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let clock = MockClock::new();
    let acquired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&acquired);
    let provider = provider(&server, credentials(), &clock).on_new_token(Arc::new(
        move |_: &Token| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    ));

    assert_eq!(provider.token().await.unwrap().access_token(), "a-1");
    assert_eq!(provider.token().await.unwrap().access_token(), "a-1");

    clock.advance(Duration::from_secs(3600));
    let refreshed = provider.token().await.unwrap();

    assert_eq!(refreshed.access_token(), "a-2");
    assert_eq!(refreshed.refresh_token(), Some("r-2"));
    assert_eq!(acquired.load(Ordering::SeqCst), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

/// Validates that refresh-only mode never calls the password grant.
///
/// # Test Steps
/// 1. The seed refresh token yields a short-lived token
/// 2. The server then rejects every refresh
/// 3. The provider surfaces the rejection with the server error code
#[tokio::test]
async fn test_refresh_only_mode_never_uses_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("refresh_token=seed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a-1", "r-1", 60)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("refresh_token=r-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid refresh token"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("x", "y", 60)))
        .expect(0)
        .mount(&server)
        .await;

    let clock = MockClock::new();
    let provider = provider(&server, GrantMode::RefreshOnly { seed: "seed".to_string() }, &clock);

    provider.token().await.unwrap();
    clock.advance(Duration::from_secs(61));

    let err = provider.token().await.unwrap_err();
    assert!(matches!(err, TokenError::Refresh(_)));
    let retrieve = err.retrieve_error().unwrap();
    assert_eq!(retrieve.error_code.as_deref(), Some("invalid_grant"));
    assert_eq!(retrieve.error_description.as_deref(), Some("Invalid refresh token"));

    let err = provider.refetch_token().await.unwrap_err();
    assert!(matches!(err, TokenError::TokenIsRefreshOnly));
}

/// Validates logout against the revocation endpoint.
///
/// # Test Steps
/// 1. Logout before any token: no request
/// 2. Acquire a token, logout: refresh token revoked
/// 3. Logout again: no request
#[tokio::test]
async fn test_logout_revokes_refresh_token_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a-1", "r-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/o/revoke_token/"))
        .and(body_string_contains("token_type_hint=refresh_token"))
        .and(body_string_contains("token=r-1"))
        .and(body_string_contains("client_id=test-client"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let clock = MockClock::new();
    let provider = provider(&server, credentials(), &clock);

    provider.logout().await.unwrap();
    provider.token().await.unwrap();
    provider.logout().await.unwrap();
    provider.logout().await.unwrap();

    assert!(provider.cached_token().await.is_none());
}

/// Validates that overlapping callers trigger a single grant.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_first_acquisition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("a-1", "r-1", 3600))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let clock = MockClock::new();
    let provider = Arc::new(provider(&server, credentials(), &clock));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.token().await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().access_token(), "a-1");
    }
}
