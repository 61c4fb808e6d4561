//! HTTP transport.
//!
//! [`HttpClient`] owns the reqwest client and the transport policy: default
//! headers, authentication, request logging, and a retry loop for rate
//! limits and server errors. Retrying lives here and only here; the
//! paginated fetch layer treats a failed page as terminal.

use crate::config::{AuthConfig, SdkConfig};
use crate::error::{SdkError, SdkResult};
use crate::paginate::PageSource;
use crate::query::QueryParams;
use async_trait::async_trait;
use freightline_core::Page;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The HTTP client for the Freightline API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in &config.custom_headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.get_with_pairs(path, &[]).await
    }

    /// Make a GET request with query pairs
    pub async fn get_with_pairs<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> SdkResult<T> {
        let response = self.execute_with_retry(path, query).await?;

        let status = response.status();
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        if self.config.enable_logging {
            debug!("Response body: {}", text);
        }

        if status.is_success() {
            serde_json::from_str(&text).map_err(SdkError::SerializationError)
        } else {
            Err(self.handle_error_response(status, &text))
        }
    }

    /// Fetch one page of a list endpoint.
    ///
    /// Sends the canonical parameter pairs plus `page=<n>` and decodes the
    /// standard list envelope.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        page: u32,
    ) -> SdkResult<Page<T>> {
        let mut query: Vec<(String, String)> = params
            .pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.push(("page".to_string(), page.to_string()));
        self.get_with_pairs(path, &query).await
    }

    /// Execute a GET with retry on rate limits and server errors
    async fn execute_with_retry(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> SdkResult<Response> {
        let url = self.url(path);

        let mut attempts = 0;
        let mut last_error: Option<SdkError> = None;
        let mut backoff = self.config.retry_initial_backoff;

        while attempts <= self.config.max_retries {
            if attempts > 0 {
                info!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempts, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, self.config.retry_max_backoff);
            }

            let mut request = self.client.get(&url);
            request = self.add_auth(request);
            if !query.is_empty() {
                request = request.query(query);
            }

            if self.config.enable_logging {
                debug!("Request: GET {}", url);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = response
                            .headers()
                            .get("Retry-After")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);

                        warn!("Rate limited, retry after {} seconds", retry_after);

                        if attempts < self.config.max_retries {
                            last_error = Some(SdkError::RateLimited { retry_after });
                            backoff = Duration::from_secs(retry_after);
                            attempts += 1;
                            continue;
                        }
                    }

                    if status.is_server_error() && attempts < self.config.max_retries {
                        warn!("Server error {}, will retry", status);
                        last_error = Some(SdkError::ServerError(format!("Status: {}", status)));
                        attempts += 1;
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    warn!("Request failed: {}", e);

                    if e.is_timeout() || e.is_connect() || e.is_request() {
                        last_error = Some(SdkError::NetworkError(e));
                    } else {
                        return Err(SdkError::NetworkError(e));
                    }

                    attempts += 1;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SdkError::Unknown("Request failed".to_string())))
    }

    /// Add authentication to a request
    fn add_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            AuthConfig::None => request,
            AuthConfig::ApiKey(key) => request.header("X-API-Key", key.as_str()),
            auth => match auth.to_header_value() {
                Some(value) => request.header(header::AUTHORIZATION, value),
                None => request,
            },
        }
    }

    /// Map an error response to an SdkError
    fn handle_error_response(&self, status: StatusCode, body: &str) -> SdkError {
        match status {
            StatusCode::UNAUTHORIZED => {
                SdkError::AuthenticationError("Invalid or missing authentication".to_string())
            }
            StatusCode::FORBIDDEN => SdkError::AuthorizationError("Access denied".to_string()),
            StatusCode::TOO_MANY_REQUESTS => SdkError::RateLimited { retry_after: 60 },
            _ if status.is_server_error() => {
                SdkError::ServerError(format!("Server error: {}", status))
            }
            _ => SdkError::from_response(status.as_u16(), body),
        }
    }
}

#[async_trait]
impl<T> PageSource<T> for HttpClient
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch_page(
        &self,
        path: &str,
        params: &QueryParams,
        page: u32,
    ) -> SdkResult<Page<T>> {
        self.get_page(path, params, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let config = SdkConfig::new("https://api.example.com");
        let client = HttpClient::new(config).unwrap();

        assert_eq!(client.url("/trips"), "https://api.example.com/trips");
        assert_eq!(client.url("trips"), "https://api.example.com/trips");
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        assert!(HttpClient::new(SdkConfig::new("")).is_err());
    }
}
