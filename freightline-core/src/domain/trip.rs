use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ids::{TripId, TruckerId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planned,
    Ongoing,
    Done,
    Cancelled,
    Invoiced,
}

/// A scheduled transport order: one vehicle movement from an origin to a
/// destination, optionally assigned to a trucker.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Trip {
    pub id: TripId,
    #[validate(length(min = 1, max = 64))]
    pub reference: String,
    pub status: TripStatus,
    pub trucker_id: Option<TruckerId>,
    #[validate(length(min = 1, max = 255))]
    pub origin: String,
    #[validate(length(min = 1, max = 255))]
    pub destination: String,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: Option<DateTime<Utc>>,
    /// Agreed price excluding tax, if a tariff grid matched.
    pub agreed_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        reference: String,
        origin: String,
        destination: String,
        scheduled_start: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TripId::new(),
            reference,
            status: TripStatus::Planned,
            trucker_id: None,
            origin,
            destination,
            scheduled_start,
            scheduled_end: None,
            agreed_price: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, TripStatus::Planned | TripStatus::Ongoing)
    }
}
