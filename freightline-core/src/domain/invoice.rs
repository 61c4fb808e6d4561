use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ids::{InvoiceId, TripId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Finalized,
    Paid,
}

/// Whether the document bills the customer or credits them back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    Invoice,
    CreditNote,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Sequential document number, assigned at finalization. Drafts have none.
    pub number: Option<String>,
    pub kind: InvoiceKind,
    pub status: InvoiceStatus,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    pub trip_ids: Vec<TripId>,
    pub total_excl_tax: Decimal,
    pub total_incl_tax: Decimal,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(kind: InvoiceKind, customer_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new(),
            number: None,
            kind,
            status: InvoiceStatus::Draft,
            customer_name,
            trip_ids: Vec::new(),
            total_excl_tax: Decimal::ZERO,
            total_incl_tax: Decimal::ZERO,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }
}
