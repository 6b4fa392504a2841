//! Lazy walk over every page of a resource listing
//!
//! The first page is requested with the caller's params. Later pages follow
//! the `next` link verbatim: it already carries the query, so nothing is
//! added to it.

use std::collections::VecDeque;

use bleemeo_domain::{Params, Resource, ResultsPage};
use futures::Stream;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::client::ApiClient;
use super::errors::{ApiError, JsonDataKind};

enum NextPage {
    First,
    Url(String),
    Done,
}

/// Iterator over the resources matching some params
pub struct ResourceIterator<'a> {
    client: &'a ApiClient,
    resource: Resource,
    params: Params,
    buffer: VecDeque<Value>,
    next_page: NextPage,
}

impl<'a> ResourceIterator<'a> {
    pub(crate) fn new(client: &'a ApiClient, resource: Resource, params: Params) -> Self {
        Self { client, resource, params, buffer: VecDeque::new(), next_page: NextPage::First }
    }

    /// Total number of matching resources, as reported by the API.
    pub async fn count(&self) -> Result<u64, ApiError> {
        self.client.count(self.resource, &self.params).await
    }

    /// Next resource, fetching the following page when needed.
    ///
    /// Returns `Ok(None)` once every page was consumed. After an error the
    /// iterator is exhausted.
    pub async fn try_next(&mut self) -> Result<Option<Value>, ApiError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            let (path, params) = match std::mem::replace(&mut self.next_page, NextPage::Done) {
                NextPage::First => (self.resource.path(), Some(&self.params)),
                NextPage::Url(url) => (url, None),
                NextPage::Done => return Ok(None),
            };

            let page: ResultsPage = self
                .client
                .request(Method::GET, &path, params, true, None)
                .await?
                .json(JsonDataKind::ResultPage)?;

            debug!(resource = %self.resource, items = page.results.len(), "fetched result page");

            if let Some(next) = page.next_url() {
                self.next_page = NextPage::Url(next.to_string());
            }
            self.buffer.extend(page.results);
        }
    }

    /// Turns the iterator into a stream of resources.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value, ApiError>> + 'a {
        futures::stream::unfold(self, |mut iter| async move {
            match iter.try_next().await {
                Ok(Some(item)) => Some((Ok(item), iter)),
                Ok(None) => None,
                Err(err) => Some((Err(err), iter)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bleemeo_common::auth::{GrantMode, TokenProvider};
    use bleemeo_common::testing::MockGrantClient;
    use bleemeo_domain::ClientConfig;
    use futures::TryStreamExt;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> ApiClient {
        let grants = MockGrantClient::new().with_token("a-1", Some("r-1"), 3600);
        let mode = GrantMode::Credentials { username: "user".to_string(), password: "pass".to_string() };
        ApiClient::builder()
            .config(ClientConfig::with_credentials("user", "pass").endpoint(server.uri()))
            .token_provider(Arc::new(TokenProvider::new(grants, mode)))
            .build()
            .expect("api client")
    }

    #[tokio::test]
    async fn test_error_exhausts_iterator() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tag/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let mut iter = client.iterator(Resource::Tag, Params::new());

        let err = iter.try_next().await.unwrap_err();
        assert!(matches!(err, ApiError::JsonUnmarshal(ref json) if json.kind == JsonDataKind::ResultPage));
        assert!(iter.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_skips_empty_pages_and_streams() {
        let server = MockServer::start().await;
        let second = format!("{}/v1/tag/?page=2", server.uri());
        Mock::given(method("GET"))
            .and(path("/v1/tag/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2, "next": null, "previous": null,
                "results": [{"id": "1"}, {"id": "2"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/tag/"))
            .and(query_param("search", "prod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2, "next": second, "previous": null, "results": []
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let params = Params::from([("search".to_string(), "prod".to_string())]);
        let items: Vec<Value> = client.iterator(Resource::Tag, params).into_stream().try_collect().await.unwrap();

        assert_eq!(items, vec![json!({"id": "1"}), json!({"id": "2"})]);
    }
}
