//! Truckers resource client.

use crate::client::HttpClient;
use crate::error::SdkResult;
use crate::paginate::Paginator;
use crate::query::QueryParams;
use freightline_core::{Page, Trucker, TruckerId};
use serde::Serialize;
use std::sync::Arc;

/// Client for trucker (driver) operations
#[derive(Debug, Clone)]
pub struct TruckersClient {
    client: Arc<HttpClient>,
}

impl TruckersClient {
    /// Create a new truckers client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Get a trucker by ID
    pub async fn get(&self, id: TruckerId) -> SdkResult<Trucker> {
        self.client.get(&format!("/truckers/{}", id)).await
    }

    /// Fetch one page of truckers matching `params`
    pub async fn list(&self, params: &ListTruckersParams, page: u32) -> SdkResult<Page<Trucker>> {
        self.client
            .get_page("/truckers", &params.to_query()?, page)
            .await
    }

    /// Start a paginated view over the truckers matching `params`.
    pub async fn paginator(
        &self,
        params: &ListTruckersParams,
    ) -> SdkResult<Paginator<Trucker, HttpClient>> {
        let paginator = Paginator::new(Arc::clone(&self.client), "/truckers");
        paginator.configure(params.to_query()?).await;
        Ok(paginator)
    }
}

/// Parameters for listing truckers
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListTruckersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Free-text search over first and last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListTruckersParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    /// Canonical query form of these filters.
    pub fn to_query(&self) -> SdkResult<QueryParams> {
        QueryParams::try_from_serialize(self)
    }
}
