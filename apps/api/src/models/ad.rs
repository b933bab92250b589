use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A promotional slot shown in the builder UI. Created and deleted by admin
/// action, never mutated, no expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    pub id: Uuid,
    pub brand_name: String,
    pub offer: String,
    pub link_url: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}
