//! Freightline SDK
//!
//! Rust client for the Freightline transport-management API: typed resource
//! clients for trips, invoices/credit notes and truckers, plus a race-safe
//! paginated fetch layer for driving incrementally-loaded list views.
//!
//! # Features
//!
//! - **Typed resource clients**: strongly-typed records and closed filter
//!   structs per list endpoint
//! - **Race-safe pagination**: [`Paginator`] accumulates pages, de-duplicates
//!   load-more triggers, and discards responses of superseded queries
//! - **Canonical query identity**: deterministic, order-independent
//!   serialization of filter sets ([`QueryParams`] / [`QueryKey`])
//! - **Transport retries**: rate-limit and server-error retries with capped
//!   exponential backoff, confined to the HTTP layer
//! - **Multiple auth methods**: API key, bearer token, or basic auth
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use freightline_sdk::{FreightlineClient, ListTripsParams, SdkConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SdkConfig::new("https://api.freightline.io")
//!         .with_api_key("your-api-key");
//!     let client = FreightlineClient::new(config)?;
//!
//!     // A live, incrementally-loadable list of matching trips.
//!     let trips = client
//!         .trips()
//!         .paginator(&ListTripsParams::new().with_text("marseille"))
//!         .await?;
//!
//!     trips.load_all().await;
//!     let view = trips.snapshot().await;
//!     println!("{} trips loaded of {:?}", view.items.len(), view.total_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Direct calls (`get`, `list`) return [`SdkResult`]. The paginated layer
//! never propagates errors: a failed page leaves the already-loaded items in
//! place, clears the loading flag and records the error in the snapshot's
//! `last_error`. See [`paginate`] for the full contract.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod paginate;
pub mod query;
pub mod resources;

// Re-export main types for convenience
pub use client::HttpClient;
pub use config::{AuthConfig, SdkConfig};
pub use error::{SdkError, SdkResult};
pub use paginate::{FetchSnapshot, PageSource, Paginator};
pub use query::{QueryKey, QueryParams};

// Re-export resource clients
pub use resources::invoices::{InvoicesClient, ListInvoicesParams};
pub use resources::trips::{ListTripsParams, TripsClient};
pub use resources::truckers::{ListTruckersParams, TruckersClient};

// Re-export the shared domain types
pub use freightline_core::{
    Invoice, InvoiceId, InvoiceKind, InvoiceStatus, Page, Trip, TripId, TripStatus, Trucker,
    TruckerId,
};

use std::sync::Arc;

/// The main client for the Freightline API.
///
/// Provides access to the API resources through dedicated sub-clients that
/// share one configured HTTP transport.
///
/// # Example
///
/// ```rust,no_run
/// use freightline_sdk::{FreightlineClient, SdkConfig};
///
/// # fn example() -> Result<(), freightline_sdk::SdkError> {
/// let client = FreightlineClient::new(
///     SdkConfig::new("https://api.freightline.io").with_bearer_token("token"),
/// )?;
///
/// let trips = client.trips();
/// let invoices = client.invoices();
/// let truckers = client.truckers();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FreightlineClient {
    http_client: Arc<HttpClient>,
    trips: TripsClient,
    invoices: InvoicesClient,
    truckers: TruckersClient,
}

impl FreightlineClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if the configuration is invalid (empty or unparseable base URL,
    /// zero timeout).
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config)?);

        Ok(Self {
            trips: TripsClient::new(Arc::clone(&http_client)),
            invoices: InvoicesClient::new(Arc::clone(&http_client)),
            truckers: TruckersClient::new(Arc::clone(&http_client)),
            http_client,
        })
    }

    /// Create a new client using a builder pattern.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// The trips client.
    pub fn trips(&self) -> &TripsClient {
        &self.trips
    }

    /// The invoices and credit-notes client.
    pub fn invoices(&self) -> &InvoicesClient {
        &self.invoices
    }

    /// The truckers client.
    pub fn truckers(&self) -> &TruckersClient {
        &self.truckers
    }

    /// The underlying HTTP client, for requests not covered by the resource
    /// clients.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// The base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Builder for creating a [`FreightlineClient`] with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: SdkConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SdkConfig::new(base_url),
        }
    }

    /// Set the authentication configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config = self.config.with_auth(auth);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the maximum number of transport-level retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    /// Enable or disable request/response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(name, value);
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<FreightlineClient> {
        FreightlineClient::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let result = FreightlineClient::builder("https://api.example.com")
            .with_auth(AuthConfig::ApiKey("test-key".to_string()))
            .with_timeout(std::time::Duration::from_secs(30))
            .with_max_retries(3)
            .build();

        assert!(result.is_ok());
        assert_eq!(result.unwrap().base_url(), "https://api.example.com");
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        assert!(FreightlineClient::builder("not a url").build().is_err());
    }

    #[test]
    fn test_client_resource_access() {
        let client = FreightlineClient::new(SdkConfig::new("https://api.example.com")).unwrap();

        let _ = client.trips();
        let _ = client.invoices();
        let _ = client.truckers();
        let _ = client.http_client();
    }
}
