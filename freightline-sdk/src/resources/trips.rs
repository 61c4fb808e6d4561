//! Trips resource client.

use crate::client::HttpClient;
use crate::error::SdkResult;
use crate::paginate::Paginator;
use crate::query::QueryParams;
use chrono::NaiveDate;
use freightline_core::{Page, Trip, TripId, TripStatus, TruckerId};
use serde::Serialize;
use std::sync::Arc;

/// Client for trip operations
#[derive(Debug, Clone)]
pub struct TripsClient {
    client: Arc<HttpClient>,
}

impl TripsClient {
    /// Create a new trips client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Get a trip by ID
    pub async fn get(&self, id: TripId) -> SdkResult<Trip> {
        self.client.get(&format!("/trips/{}", id)).await
    }

    /// Fetch one page of trips matching `params`
    pub async fn list(&self, params: &ListTripsParams, page: u32) -> SdkResult<Page<Trip>> {
        self.client
            .get_page("/trips", &params.to_query()?, page)
            .await
    }

    /// Start a paginated view over the trips matching `params`.
    ///
    /// Page 1 is fetched before this returns; feed later filter changes to
    /// [`Paginator::configure`].
    pub async fn paginator(
        &self,
        params: &ListTripsParams,
    ) -> SdkResult<Paginator<Trip, HttpClient>> {
        let paginator = Paginator::new(Arc::clone(&self.client), "/trips");
        paginator.configure(params.to_query()?).await;
        Ok(paginator)
    }
}

/// Parameters for listing trips
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListTripsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TripStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trucker: Option<TruckerId>,
    /// Free-text search over reference, origin and destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_after: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_before: Option<NaiveDate>,
    /// Sort field, `-` prefixed for descending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListTripsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: TripStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_trucker(mut self, trucker: TruckerId) -> Self {
        self.trucker = Some(trucker);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_window(mut self, after: NaiveDate, before: NaiveDate) -> Self {
        self.start_after = Some(after);
        self.start_before = Some(before);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_builder() {
        let params = ListTripsParams::new()
            .with_status(TripStatus::Planned)
            .with_text("marseille")
            .with_ordering("-scheduled_start");

        assert_eq!(params.status, Some(TripStatus::Planned));
        assert_eq!(params.text.as_deref(), Some("marseille"));
        assert_eq!(params.ordering.as_deref(), Some("-scheduled_start"));
    }

    #[test]
    fn test_params_canonical_query() {
        let trucker = TruckerId::new();
        let query = ListTripsParams::new()
            .with_status(TripStatus::Ongoing)
            .with_trucker(trucker)
            .to_query()
            .unwrap();

        assert_eq!(query.get("status"), Some("ongoing"));
        assert_eq!(query.get("trucker"), Some(trucker.to_string().as_str()));
        assert_eq!(query.get("text"), None);
    }

    #[test]
    fn test_date_window_renders_iso_dates() {
        let query = ListTripsParams::new()
            .with_window(
                NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            )
            .to_query()
            .unwrap();

        assert_eq!(query.get("start_after"), Some("2026-08-01"));
        assert_eq!(query.get("start_before"), Some("2026-08-31"));
    }
}
