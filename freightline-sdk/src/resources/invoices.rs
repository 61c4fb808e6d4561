//! Invoices resource client.

use crate::client::HttpClient;
use crate::error::SdkResult;
use crate::paginate::Paginator;
use crate::query::QueryParams;
use chrono::NaiveDate;
use freightline_core::{Invoice, InvoiceId, InvoiceKind, InvoiceStatus, Page};
use serde::Serialize;
use std::sync::Arc;

/// Client for invoice and credit-note operations
#[derive(Debug, Clone)]
pub struct InvoicesClient {
    client: Arc<HttpClient>,
}

impl InvoicesClient {
    /// Create a new invoices client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Get an invoice by ID
    pub async fn get(&self, id: InvoiceId) -> SdkResult<Invoice> {
        self.client.get(&format!("/invoices/{}", id)).await
    }

    /// Fetch one page of invoices matching `params`
    pub async fn list(&self, params: &ListInvoicesParams, page: u32) -> SdkResult<Page<Invoice>> {
        self.client
            .get_page("/invoices", &params.to_query()?, page)
            .await
    }

    /// Start a paginated view over the invoices matching `params`.
    pub async fn paginator(
        &self,
        params: &ListInvoicesParams,
    ) -> SdkResult<Paginator<Invoice, HttpClient>> {
        let paginator = Paginator::new(Arc::clone(&self.client), "/invoices");
        paginator.configure(params.to_query()?).await;
        Ok(paginator)
    }
}

/// Parameters for listing invoices
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListInvoicesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<InvoiceKind>,
    /// Free-text search over number and customer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_after: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_before: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListInvoicesParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_kind(mut self, kind: InvoiceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_due_window(mut self, after: NaiveDate, before: NaiveDate) -> Self {
        self.due_after = Some(after);
        self.due_before = Some(before);
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
    fn test_credit_note_filter_renders_snake_case() {
        let query = ListInvoicesParams::new()
            .with_kind(InvoiceKind::CreditNote)
            .with_status(InvoiceStatus::Finalized)
            .to_query()
            .unwrap();

        assert_eq!(query.get("kind"), Some("credit_note"));
        assert_eq!(query.get("status"), Some("finalized"));
    }

    #[test]
    fn test_empty_params_are_an_empty_query() {
        let query = ListInvoicesParams::new().to_query().unwrap();
        assert!(query.is_empty());
    }
}
