use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ids::TruckerId;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Trucker {
    pub id: TruckerId,
    #[validate(length(min = 1, max = 128))]
    pub first_name: String,
    #[validate(length(min = 1, max = 128))]
    pub last_name: String,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trucker {
    pub fn new(first_name: String, last_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: TruckerId::new(),
            first_name,
            last_name,
            phone: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
