//! Authenticated request executor
//!
//! Every request goes through [`ApiClient::execute`], which:
//! - refuses to send anything while a throttle deadline is pending
//! - attaches the bearer token on authenticated requests
//! - on a 401, refetches the token and resends the request once
//! - on a 429, records the `Retry-After` deadline
//! - turns error statuses into typed [`ApiError`]s
//!
//! [`ApiClient::request`] adds a single transparent retry on throttling when
//! the advertised delay is short enough.

use std::sync::Arc;
use std::time::Duration;

use bleemeo_common::auth::{GrantMode, NewTokenCallback, OAuthClient, Token, TokenProvider};
use bleemeo_common::Clock;
use bleemeo_domain::{Body, ClientConfig, Params, Resource, ResultsPage, ACCOUNT_HEADER};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use super::auth::{AccessTokenProvider, AuthInjector};
use super::errors::{
    ApiError, AuthError, JsonDataKind, JsonError, ResponseDetails, StatusError, ThrottleError,
    ERROR_BODY_LIMIT,
};
use super::iterator::ResourceIterator;
use super::throttle::{parse_retry_after, ThrottleGate};
use crate::http::{drain, read_body_prefix, HttpClient};

/// Status and body of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body, which must be valid JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::JsonUnmarshal`] tagged with `kind`.
    pub fn json<T: DeserializeOwned>(&self, kind: JsonDataKind) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|source| {
            let data = &self.body[..self.body.len().min(ERROR_BODY_LIMIT)];
            ApiError::JsonUnmarshal(JsonError::new(kind, source, data))
        })
    }
}

/// Client for the Bleemeo API
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct ApiClient {
    http: HttpClient,
    base: Url,
    auth: AuthInjector,
    headers: HeaderMap,
    throttle: ThrottleGate,
    max_auto_retry: Duration,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Time left on the throttle deadline set by the last 429, if any.
    pub fn throttle_remaining(&self) -> Option<Duration> {
        self.throttle.remaining()
    }

    /// Send a request, waiting out one throttle if it is short enough.
    ///
    /// When the API throttles the client with a delay no longer than the
    /// configured maximum, the client sleeps for that delay and resends the
    /// request once. A second throttle is returned to the caller.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        authenticated: bool,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        match self.execute(method.clone(), path, params, authenticated, body).await {
            Err(ApiError::Throttle(err)) if err.delay <= self.max_auto_retry => {
                info!(delay_secs = err.delay.as_secs(), "throttled, retrying once after the delay");
                tokio::time::sleep(err.delay).await;
                self.execute(method, path, params, authenticated, body).await
            }
            other => other,
        }
    }

    /// Send one logical request.
    ///
    /// `path` is resolved against the base URL, so an absolute URL (such as a
    /// pagination `next` link) is used as is. `params` replace query
    /// parameters of the same name already present in `path`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Throttle`] while a previous throttle deadline is pending,
    ///   or when the API answers 429
    /// - [`ApiError::Auth`] when the API answers 401 even after a token
    ///   refetch, or rejects the grant
    /// - [`ApiError::Refetch`] when the token refetch after a 401 fails
    /// - [`ApiError::NotFound`] on 404
    /// - [`ApiError::Status`] on any other 4xx or 5xx
    /// - [`ApiError::Transport`] when the request could not be sent
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        authenticated: bool,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve(path, params)?;

        if let Some(remaining) = self.throttle.remaining() {
            return Err(throttle_error(url.path(), None, remaining));
        }

        let mut response = self
            .send(&method, &url, authenticated, body)
            .await
            .map_err(|err| transport(err, "request execution failed"))?;

        if response.status() == StatusCode::UNAUTHORIZED && authenticated {
            drain(response).await;
            warn!(path = url.path(), "API rejected the token, refetching it");
            self.auth.refetch(url.path()).await?;

            response = self
                .send(&method, &url, authenticated, body)
                .await
                .map_err(|err| transport(err, "request execution retry failed"))?;
        }

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let delay = parse_retry_after(response.headers());
            let content_type = content_type(&response);
            drain(response).await;
            self.throttle.record(delay);
            return Err(throttle_error(url.path(), content_type, delay));
        }

        classify(response, url.path()).await
    }

    /// Fetch one resource, restricted to `fields` when not empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no resource has this id.
    #[instrument(skip_all, fields(resource = %resource, id = %id))]
    pub async fn get(&self, resource: Resource, id: &str, fields: &[String]) -> Result<Value, ApiError> {
        let params = fields_params(fields);
        let response =
            self.request(Method::GET, &resource.item_path(id), params.as_ref(), true, None).await?;

        response.json(JsonDataKind::ResponseBody)
    }

    /// Fetch page `page` (1-based) of the resources matching `params`.
    ///
    /// Prefer [`ApiClient::iterator`] to walk every page.
    #[instrument(skip_all, fields(resource = %resource, page))]
    pub async fn get_page(
        &self,
        resource: Resource,
        page: u32,
        page_size: u32,
        params: &Params,
    ) -> Result<ResultsPage, ApiError> {
        let mut params = params.clone();
        params.insert("page".to_string(), page.to_string());
        params.insert("page_size".to_string(), page_size.to_string());

        let response = self.request(Method::GET, &resource.path(), Some(&params), true, None).await?;

        response.json(JsonDataKind::ResultPage)
    }

    /// Number of resources matching `params`, fetching a single item.
    pub async fn count(&self, resource: Resource, params: &Params) -> Result<u64, ApiError> {
        Ok(self.get_page(resource, 1, 1, params).await?.count)
    }

    /// Lazily walks every resource matching `params`.
    pub fn iterator(&self, resource: Resource, params: Params) -> ResourceIterator<'_> {
        ResourceIterator::new(self, resource, params)
    }

    /// Create a resource and return it as the API stored it.
    #[instrument(skip_all, fields(resource = %resource))]
    pub async fn create(&self, resource: Resource, body: &Body) -> Result<Value, ApiError> {
        let payload = json_body(body)?;
        let response =
            self.request(Method::POST, &resource.path(), None, true, Some(&payload)).await?;

        response.json(JsonDataKind::ResponseBody)
    }

    /// Partially update a resource with the fields present in `body`.
    #[instrument(skip_all, fields(resource = %resource, id = %id))]
    pub async fn update(&self, resource: Resource, id: &str, body: &Body) -> Result<Value, ApiError> {
        let payload = json_body(body)?;
        let response = self
            .request(Method::PATCH, &resource.item_path(id), None, true, Some(&payload))
            .await?;

        response.json(JsonDataKind::ResponseBody)
    }

    #[instrument(skip_all, fields(resource = %resource, id = %id))]
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, &resource.item_path(id), None, true, None).await?;
        Ok(())
    }

    /// Current token, acquiring or refreshing it if needed.
    pub async fn get_token(&self) -> Result<Token, ApiError> {
        self.auth.provider().token().await.map_err(ApiError::TokenRetrieval)
    }

    /// Revoke the token so it can no longer be used.
    ///
    /// Does nothing when no valid token is held.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.auth.provider().logout().await.map_err(ApiError::Token)
    }

    fn resolve(&self, path: &str, params: Option<&Params>) -> Result<Url, ApiError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|source| ApiError::InvalidUrl { uri: path.to_string(), source })?;

        if let Some(params) = params.filter(|params| !params.is_empty()) {
            let mut pairs: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(key, _)| !params.contains_key(key.as_ref()))
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();
            pairs.extend(params.iter().map(|(key, value)| (key.clone(), value.clone())));

            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        authenticated: bool,
        body: Option<&[u8]>,
    ) -> Result<Response, ApiError> {
        let mut request = self.http.request(method.clone(), url.clone());

        if authenticated {
            request = self.auth.inject(request, url.path()).await?;
        }

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body.to_vec());
        }

        request = request.headers(self.headers.clone());

        self.http.send(request).await.map_err(|source| ApiError::Transport {
            context: "failed to send request",
            source,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("max_auto_retry", &self.max_auto_retry)
            .finish_non_exhaustive()
    }
}

/// Serialises a request body.
///
/// # Errors
///
/// Returns [`ApiError::JsonMarshal`] tagged as a request body.
pub fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(value).map_err(|source| {
        ApiError::JsonMarshal(JsonError::new(JsonDataKind::RequestBody, source, Vec::new()))
    })
}

fn fields_params(fields: &[String]) -> Option<Params> {
    let fields: Vec<&str> =
        fields.iter().map(String::as_str).filter(|field| !field.is_empty()).collect();

    (!fields.is_empty()).then(|| Params::from([("fields".to_string(), fields.join(","))]))
}

fn content_type(response: &Response) -> Option<String> {
    response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()).map(str::to_string)
}

// Send failures keep their own wording; auth failures pass through untouched.
fn transport(err: ApiError, context: &'static str) -> ApiError {
    match err {
        ApiError::Transport { source, .. } => ApiError::Transport { context, source },
        other => other,
    }
}

fn throttle_error(path: &str, content_type: Option<String>, delay: Duration) -> ApiError {
    ApiError::Throttle(ThrottleError {
        details: ResponseDetails {
            path: path.to_string(),
            status: StatusCode::TOO_MANY_REQUESTS,
            content_type,
            message: "Too Many Requests".to_string(),
            body: Vec::new(),
        },
        delay,
    })
}

async fn classify(response: Response, path: &str) -> Result<ApiResponse, ApiError> {
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let content_type = content_type(&response);
        let body = read_body_prefix(response, ERROR_BODY_LIMIT).await;
        let details = ResponseDetails {
            path: path.to_string(),
            status,
            content_type,
            message: status.to_string(),
            body,
        };
        return Err(error_from_status(details));
    }

    let body = response.bytes().await.map_err(|source| ApiError::Transport {
        context: "can't read response body",
        source,
    })?;

    Ok(ApiResponse { status, body: body.to_vec() })
}

/// Field errors of a 400, each field mapping to one or several messages.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct UnauthorizedBody {
    detail: Option<String>,
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    messages: Vec<UnauthorizedMessage>,
}

#[derive(Deserialize)]
struct UnauthorizedMessage {
    #[serde(default)]
    message: String,
}

fn error_from_status(mut details: ResponseDetails) -> ApiError {
    match details.status {
        status if status.is_server_error() => ApiError::Status(StatusError { details, cause: None }),
        StatusCode::BAD_REQUEST => {
            match serde_json::from_slice::<std::collections::BTreeMap<String, FieldMessages>>(
                &details.body,
            ) {
                Ok(fields) => {
                    details.message = bad_request_message(&fields);
                    ApiError::Status(StatusError { details, cause: None })
                }
                Err(source) => {
                    let cause = JsonError::new(JsonDataKind::Details400, source, details.body.clone());
                    ApiError::Status(StatusError { details, cause: Some(cause) })
                }
            }
        }
        StatusCode::UNAUTHORIZED => match serde_json::from_slice::<UnauthorizedBody>(&details.body) {
            Ok(body) => {
                let message = body
                    .messages
                    .into_iter()
                    .next()
                    .map(|first| first.message)
                    .or(body.error_description)
                    .or(body.detail)
                    .filter(|message| !message.is_empty());
                if let Some(message) = message {
                    details.message = message;
                }
                ApiError::Auth(AuthError { details, error_code: body.error.or(body.code), cause: None })
            }
            Err(source) => {
                let cause = JsonError::new(JsonDataKind::Details401, source, details.body.clone());
                ApiError::Auth(AuthError { details, error_code: None, cause: Some(cause) })
            }
        },
        StatusCode::NOT_FOUND => ApiError::NotFound(details),
        _ => ApiError::Status(StatusError { details, cause: None }),
    }
}

fn bad_request_message(fields: &std::collections::BTreeMap<String, FieldMessages>) -> String {
    let mut message = "Bad request:".to_string();

    for (field, errors) in fields {
        let errors = match errors {
            FieldMessages::One(error) => error.clone(),
            FieldMessages::Many(errors) => errors.join(" / "),
        };
        message.push_str(&format!("\n- {field}: {errors}"));
    }

    message
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ClientConfig,
    http_client: Option<reqwest::Client>,
    clock: Option<Arc<dyn Clock>>,
    on_new_token: Option<NewTokenCallback>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Send every request, token grants included, through this client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Called with every newly acquired token.
    #[must_use]
    pub fn on_new_token(mut self, callback: NewTokenCallback) -> Self {
        self.on_new_token = Some(callback);
        self
    }

    /// Use this provider instead of one built from the configuration.
    #[must_use]
    pub fn token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Token`] with `NoAuthMeanProvided` when neither a
    ///   username nor a seed refresh token is configured
    /// - [`ApiError::Config`] when the endpoint or a header is invalid
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config;

        let http = match self.http_client {
            Some(client) => HttpClient::from_client(client),
            None => HttpClient::builder()
                .timeout(config.timeout())
                .user_agent(&config.user_agent)
                .build()
                .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?,
        };

        let base = base_url(&config.endpoint)?;
        let headers = default_headers(&config)?;

        let provider = match self.token_provider {
            Some(provider) => provider,
            None => {
                let mode =
                    GrantMode::select(config.login(), config.password.as_deref(), config.seed_refresh_token())?;

                let oauth = OAuthClient::new(http.inner().clone(), &config.endpoint, &config.oauth_client_id)
                    .map_err(|e| ApiError::Config(e.to_string()))?
                    .with_client_secret(config.client_secret().map(str::to_string))
                    .with_user_agent(&config.user_agent);

                let mut provider =
                    TokenProvider::new(oauth, mode).with_expiry_leeway(config.token_expiry_leeway());
                if let Some(clock) = self.clock {
                    provider = provider.with_clock(clock);
                }
                if let Some(callback) = self.on_new_token {
                    provider = provider.on_new_token(callback);
                }

                Arc::new(provider)
            }
        };

        info!(endpoint = %base, "Bleemeo API client ready");

        Ok(ApiClient {
            http,
            base,
            auth: AuthInjector::new(provider),
            headers,
            throttle: ThrottleGate::new(),
            max_auto_retry: config.throttle_max_auto_retry_delay(),
        })
    }
}

fn base_url(endpoint: &str) -> Result<Url, ApiError> {
    let mut base = Url::parse(endpoint)
        .map_err(|e| ApiError::Config(format!("invalid endpoint URL {endpoint:?}: {e}")))?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok(base)
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(&config.user_agent)?);

    if let Some(account) = config.account_id.as_deref().filter(|account| !account.is_empty()) {
        headers.insert(ACCOUNT_HEADER, header_value(account)?);
    }

    for (name, value) in &config.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Config(format!("invalid header name {name:?}: {e}")))?;
        headers.insert(name, header_value(value)?);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| ApiError::Config(format!("invalid header value: {e}")))
}

#[cfg(test)]
mod tests {
    use bleemeo_common::testing::MockGrantClient;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(server: &MockServer, grants: MockGrantClient) -> ApiClient {
        let mode = GrantMode::Credentials { username: "user".to_string(), password: "pass".to_string() };
        ApiClient::builder()
            .config(ClientConfig::with_credentials("user", "pass").endpoint(server.uri()))
            .token_provider(Arc::new(TokenProvider::new(grants, mode)))
            .build()
            .expect("api client")
    }

    #[test]
    fn test_bad_request_message_is_sorted() {
        let fields = serde_json::from_str(r#"{"name": ["required", "too short"], "label": "bad"}"#)
            .expect("fields");

        assert_eq!(bad_request_message(&fields), "Bad request:\n- label: bad\n- name: required / too short");
    }

    #[test]
    fn test_fields_params() {
        assert!(fields_params(&[]).is_none());
        assert!(fields_params(&[String::new()]).is_none());

        let params = fields_params(&["id".to_string(), "label".to_string()]).unwrap();
        assert_eq!(params["fields"], "id,label");
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        assert_eq!(base_url("https://api.bleemeo.com").unwrap().as_str(), "https://api.bleemeo.com/");
        assert_eq!(base_url("http://localhost:8000/api").unwrap().as_str(), "http://localhost:8000/api/");
        assert!(matches!(base_url("not a url"), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let mut config = ClientConfig::with_credentials("user", "pass");
        config.extra_headers.insert("bad header".to_string(), "x".to_string());

        assert!(matches!(default_headers(&config), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_build_without_auth_mean() {
        let err = ApiClient::builder().config(ClientConfig::default()).build().unwrap_err();

        assert!(matches!(err, ApiError::Token(bleemeo_common::auth::TokenError::NoAuthMeanProvided)));
    }

    #[tokio::test]
    async fn test_params_override_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/metric/"))
            .and(query_param("page", "2"))
            .and(query_param("active", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, MockGrantClient::new()).await;
        let params = Params::from([("page".to_string(), "2".to_string())]);

        client
            .execute(Method::GET, "v1/metric/?page=1&active=true", Some(&params), false, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/tag/"))
            .and(header("authorization", "Bearer a-1"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", "Bleemeo Rust Client"))
            .and(header("x-bleemeo-account", "acc-1"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id": "t-1"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let grants = MockGrantClient::new().with_token("a-1", Some("r-1"), 3600);
        let mode = GrantMode::Credentials { username: "user".to_string(), password: "pass".to_string() };
        let client = ApiClient::builder()
            .config(
                ClientConfig::with_credentials("user", "pass").endpoint(server.uri()).account_id("acc-1"),
            )
            .token_provider(Arc::new(TokenProvider::new(grants, mode)))
            .build()
            .unwrap();

        let response = client.execute(Method::POST, "v1/tag/", None, true, Some(b"{}")).await.unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_unauthenticated_401_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"detail": "nope"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let grants = MockGrantClient::new();
        let client = client(&server, grants.clone()).await;

        let err = client.execute(Method::GET, "v1/", None, false, None).await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(grants.password_grants(), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_body_parsing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/a/"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"detail": "generic", "code": "token_not_valid",
                    "messages": [{"token_class": "AccessToken", "message": "Token is expired"}]}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/b/"))
            .respond_with(ResponseTemplate::new(401).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = client(&server, MockGrantClient::new()).await;

        let err = client.execute(Method::GET, "v1/a/", None, false, None).await.unwrap_err();
        assert_eq!(err.auth_error_code(), Some("token_not_valid"));
        assert_eq!(err.details().unwrap().message, "Token is expired");

        let err = client.execute(Method::GET, "v1/b/", None, false, None).await.unwrap_err();
        assert!(err.is_auth());
        let ApiError::Auth(auth) = &err else { panic!("expected auth error") };
        assert_eq!(auth.cause.as_ref().unwrap().kind, JsonDataKind::Details401);
    }
}
