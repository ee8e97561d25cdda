use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::api::errors::ApiError;

/// HTTP client with bounded per-call timeouts.
///
/// Exceeding the timeout drops the in-flight request (aborting the
/// connection) and yields [`ApiError::Timeout`]. There is no automatic
/// retry: callers re-issue explicitly via their idempotent refetch
/// operations.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder under the default timeout.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        self.send_with_timeout(builder, self.timeout).await
    }

    /// Execute the provided request builder under an explicit timeout.
    pub async fn send_with_timeout(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<Response, ApiError> {
        let request = builder
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build request: {err}")))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match tokio::time::timeout(timeout, self.client.execute(request)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Ok(Err(err)) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(classify_transport_error(&err, url.as_str(), timeout))
            }
            // Dropping the future aborts the in-flight request
            Err(_) => {
                debug!(%method, %url, ?timeout, "HTTP request timed out");
                Err(ApiError::Timeout { timeout, url: url.to_string() })
            }
        }
    }

    /// Configured default timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(dentnotion_domain::DEFAULT_API_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
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

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut builder = ReqwestClient::builder();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}

fn classify_transport_error(err: &reqwest::Error, url: &str, timeout: Duration) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout { timeout, url: url.to_string() };
    }

    let message = if err.is_connect() {
        format!("cannot reach the backend server at {url}; ensure the backend is running")
    } else {
        format!("unable to connect to the server: {err}")
    };

    ApiError::Unreachable { message, url: url.to_string() }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::StatusCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_timeout(timeout: Duration) -> HttpClient {
        HttpClient::builder().timeout(timeout).build().expect("http client")
    }

    #[tokio::test]
    async fn returns_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_secs(5));
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn classifies_slow_responses_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_millis(50));
        let result = client.send(client.request(Method::GET, server.uri())).await;

        match result {
            Err(ApiError::Timeout { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("expected timeout error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn per_call_timeout_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
            .mount(&server)
            .await;

        // Default would time out, the per-call override does not
        let client = client_with_timeout(Duration::from_millis(20));
        let response = client
            .send_with_timeout(
                client.request(Method::GET, server.uri()),
                Duration::from_secs(5),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn classifies_refused_connections_as_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{}", addr);

        let client = client_with_timeout(Duration::from_secs(5));
        let result = client.send(client.request(Method::GET, &url)).await;

        match result {
            Err(ApiError::Unreachable { message, .. }) => {
                assert!(message.contains("server"));
            }
            other => panic!("expected unreachable error, got {other:?}"),
        }
    }
}
