use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Dietary {
    Veg,
    NonVeg,
}

/// A seller's surplus-food offer. Expiry is derived from `created_at` plus
/// `pickup_window_hours`; expired listings stay stored and are reported as
/// unavailable in read views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodListing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub dish_name: String,
    pub description: String,
    pub serves: u16,
    pub storage: String,
    pub dietary: Dietary,
    pub pickup_window_hours: u32,
    pub created_at: DateTime<Utc>,
}
