use std::time::Duration;

pub use bleemeo_common::auth::read_body_prefix;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

/// HTTP client performing exactly one attempt per request.
///
/// Retries are decided by the API layer, which knows about 401 and 429.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: ReqwestClient) -> Self {
        Self { client }
    }

    /// The underlying reqwest client, shared with the OAuth client.
    pub fn inner(&self) -> &ReqwestClient {
        &self.client
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, path = url.path(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, path = url.path(), %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, path = url.path(), error = %err, "HTTP request failed");
                Err(err)
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, reqwest::Error> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        Ok(HttpClient { client: builder.build()? })
    }
}

/// Consume and discard whatever is left of the body.
///
/// Read errors are ignored: the response is being thrown away anyway.
pub async fn drain(mut response: Response) {
    while let Ok(Some(_)) = response.chunk().await {}
}


#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().build().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn applies_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "test-agent"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().user_agent("test-agent").build().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn reads_only_body_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("0123456789"))
            .mount(&server)
            .await;

        let client = HttpClient::builder().build().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(read_body_prefix(response, 4).await, b"0123".to_vec());
    }

    #[tokio::test]
    async fn fails_on_network_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::builder().build().expect("http client");
        let result = client.send(client.request(Method::GET, format!("http://{addr}"))).await;

        assert!(result.is_err());
    }
}
