use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review state of a payment submission. Manual admin approval is the only
/// transition out of `Pending`; resubmission under the same transaction id
/// resets an `Approved` record back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
}

/// One ledger entry, keyed by the user-asserted `transaction_id`.
///
/// `submitted_at` is re-stamped on every submission. `approved_at` and
/// `expires_at` are set together by the approval action and cleared on
/// resubmission, so expiry logic only ever reads `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub username: String,
    pub user_email: String,
    pub transaction_id: String,
    pub template_id: String,
    pub status: PaymentStatus,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Base64 data URL of the uploaded receipt. Evidentiary only, never parsed.
    pub receipt_data_url: String,
}

/// A user row derived from the ledger; the system has no user table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub first_seen: DateTime<Utc>,
}
