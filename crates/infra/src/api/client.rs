//! Shared API client for the domain resources
//!
//! Every resource call funnels through here: one place applies the bounded
//! timeout, attaches the bearer credential, classifies failures, and parses
//! success bodies. Error messages concatenate the caller-supplied context
//! prefix, the status code, and the best-effort server detail, e.g.
//! `"Failed to create appointment: 400 - Validation error"`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::auth::AccessTokenProvider;
use super::envelope::{normalize_list, ListEnvelope};
use super::errors::ApiError;
use crate::http::HttpClient;

/// Timeout for the health probe; kept short so startup checks stay snappy
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (e.g. "http://localhost:8000/api")
    pub base_url: String,
    /// Default timeout for API requests
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: dentnotion_domain::DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(dentnotion_domain::DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl From<&dentnotion_domain::ApiConfig> for ApiClientConfig {
    fn from(config: &dentnotion_domain::ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// API client shared by every domain resource
pub struct ApiClient {
    http: HttpClient,
    config: ApiClientConfig,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClient {
    /// Create a new API client without authentication
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be created
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config, auth: None })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a GET request
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be
    /// deserialized
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T, ApiError> {
        let value = self.execute(Method::GET, path, None, &[], context).await?;
        self.into_typed(value, path)
    }

    /// Execute a GET request for a list resource, normalizing the payload
    /// through the list envelope
    ///
    /// # Errors
    /// Returns error if the request fails or an item cannot be deserialized
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<ListEnvelope<T>, ApiError> {
        self.get_list_with_query(path, &[], context).await
    }

    /// Execute a GET request for a list resource with query parameters
    ///
    /// # Errors
    /// Returns error if the request fails or an item cannot be deserialized
    pub async fn get_list_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<ListEnvelope<T>, ApiError> {
        let value = self.execute(Method::GET, path, None, query, context).await?;
        normalize_list(value).into_typed(&self.endpoint(path))
    }

    /// Execute a POST request
    ///
    /// # Errors
    /// Returns error if the body cannot be serialized, the request fails,
    /// or the response cannot be deserialized
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::Config(format!("failed to serialize request body: {err}")))?;
        let value = self.execute(Method::POST, path, Some(body), &[], context).await?;
        self.into_typed(value, path)
    }

    /// Execute a PUT request
    ///
    /// # Errors
    /// Returns error if the body cannot be serialized, the request fails,
    /// or the response cannot be deserialized
    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::Config(format!("failed to serialize request body: {err}")))?;
        let value = self.execute(Method::PUT, path, Some(body), &[], context).await?;
        self.into_typed(value, path)
    }

    /// Execute a DELETE request; any success status (including 204) is Ok
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, path: &str, context: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None, &[], context).await?;
        Ok(())
    }

    /// Execute a multipart POST (file upload) with an explicit timeout
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be
    /// deserialized
    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        timeout: Duration,
        context: &str,
    ) -> Result<R, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "multipart POST request");

        let mut request = self.http.request(Method::POST, &url).multipart(form);
        if let Some(token) = self.bearer().await {
            request = request.bearer_auth(token);
        }

        let response = self.http.send_with_timeout(request, timeout).await?;
        let value = Self::read_body(response, &url, context).await?;
        self.into_typed(value, path)
    }

    /// Health check for the backend
    ///
    /// # Returns
    /// `true` if the backend is reachable and healthy
    ///
    /// # Errors
    /// Returns error if the backend cannot be reached at all
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let url = self.endpoint("/health/");
        debug!(url = %url, "health check");

        let request = self.http.request(Method::GET, &url);
        match self.http.send_with_timeout(request, HEALTH_CHECK_TIMEOUT).await {
            Ok(response) if response.status().is_success() => {
                info!("backend is healthy");
                Ok(true)
            }
            Ok(response) => {
                warn!(status = %response.status(), "backend returned non-success status");
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "health check failed");
                Err(err)
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn bearer(&self) -> Option<String> {
        match &self.auth {
            Some(provider) => provider.access_token().await,
            None => None,
        }
    }

    /// Issue one request and normalize its outcome
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!(%method, url = %url, "API request");

        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.bearer().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        Self::read_body(response, &url, context).await
    }

    /// Read a response into a JSON value, converting non-2xx statuses into
    /// `Http` errors with the best-effort server detail
    async fn read_body(
        response: reqwest::Response,
        url: &str,
        context: &str,
    ) -> Result<Value, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed: Option<Value> = serde_json::from_str(&text).ok();
            let detail_text = parsed
                .as_ref()
                .and_then(extract_detail)
                .or_else(|| {
                    let trimmed = text.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
                .unwrap_or_else(|| "Unknown error".to_string());

            let message = format!("{context}: {} - {detail_text}", status.as_u16());
            warn!(%status, url = %url, "API error response");

            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
                url: url.to_string(),
                detail: parsed,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let bytes = response.bytes().await.map_err(|err| ApiError::MalformedResponse {
            message: err.to_string(),
            url: url.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::MalformedResponse {
            message: err.to_string(),
            url: url.to_string(),
        })
    }

    fn into_typed<T: DeserializeOwned>(&self, value: Value, path: &str) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|err| ApiError::MalformedResponse {
            message: err.to_string(),
            url: self.endpoint(path),
        })
    }
}

/// Best-effort extraction of the server's error message from a parsed body:
/// the `error` field, then `detail`, then the whole body as compact JSON.
fn extract_detail(body: &Value) -> Option<String> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Some(error.to_string());
    }
    if let Some(detail) = body.get("detail") {
        return Some(match detail {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
    }
    if body.is_object() {
        return Some(body.to_string());
    }
    None
}

/// Builder for the API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the access-token provider for authenticated calls
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be created
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let mut client = ApiClient::new(config)?;
        client.auth = self.auth;
        Ok(client)
    }
}
