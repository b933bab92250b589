//! Storage — pluggable, trait-based repositories.
//!
//! The evaluator and the approval action depend only on these traits, never
//! on a concrete engine. Two backends ship: `memory` (reference semantics,
//! process-lifetime state, also the test double) and `pg` (sqlx Postgres,
//! selected when `DATABASE_URL` is configured). Each backend owns its own
//! write discipline.
//!
//! `AppState` holds `Arc<dyn PaymentStore>` and `Arc<dyn AdStore>`.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ad::AdRecord;
use crate::models::payment::PaymentRecord;

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Inserts or fully overwrites the record with the same `transaction_id`.
    /// The ledger holds at most one record per transaction id; records are
    /// never deleted.
    async fn upsert(&self, record: PaymentRecord) -> Result<(), AppError>;

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentRecord>, AppError>;

    async fn list_by_username(&self, username: &str) -> Result<Vec<PaymentRecord>, AppError>;

    /// All records, newest submission first (the admin review ordering).
    async fn list_all(&self) -> Result<Vec<PaymentRecord>, AppError>;

    /// Marks the record approved with the given stamps. The caller computes
    /// the expiry; the store just executes the write atomically.
    /// `NotFound` if no record matches.
    async fn approve(
        &self,
        transaction_id: &str,
        approved_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<PaymentRecord, AppError>;
}

#[async_trait]
pub trait AdStore: Send + Sync {
    async fn create(&self, ad: AdRecord) -> Result<(), AppError>;

    /// `NotFound` if no ad matches.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// All ads, newest first.
    async fn list(&self) -> Result<Vec<AdRecord>, AppError>;
}
