//! In-memory backends: the reference system's process-lifetime "database".
//! State is populated empty at startup and discarded at process end.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ad::AdRecord;
use crate::models::payment::{PaymentRecord, PaymentStatus};
use crate::store::{AdStore, PaymentStore};

#[derive(Default)]
pub struct MemoryPaymentStore {
    records: RwLock<Vec<PaymentRecord>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn upsert(&self, record: PaymentRecord) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.transaction_id == record.transaction_id)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.transaction_id == transaction_id)
            .cloned())
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<PaymentRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.username == username)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<PaymentRecord>, AppError> {
        let records = self.records.read().await;
        let mut all: Vec<PaymentRecord> = records.clone();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(all)
    }

    async fn approve(
        &self,
        transaction_id: &str,
        approved_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<PaymentRecord, AppError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.transaction_id == transaction_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("payment {transaction_id} not found"))
            })?;
        record.status = PaymentStatus::Approved;
        record.approved_at = Some(approved_at);
        record.expires_at = Some(expires_at);
        Ok(record.clone())
    }
}

#[derive(Default)]
pub struct MemoryAdStore {
    ads: RwLock<Vec<AdRecord>>,
}

impl MemoryAdStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdStore for MemoryAdStore {
    async fn create(&self, ad: AdRecord) -> Result<(), AppError> {
        self.ads.write().await.push(ad);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut ads = self.ads.write().await;
        let before = ads.len();
        ads.retain(|a| a.id != id);
        if ads.len() == before {
            return Err(AppError::NotFound(format!("ad {id} not found")));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AdRecord>, AppError> {
        let ads = self.ads.read().await;
        let mut all: Vec<AdRecord> = ads.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
