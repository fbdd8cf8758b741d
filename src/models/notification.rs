use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub listing_id: Uuid,
    pub message: String,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
}
