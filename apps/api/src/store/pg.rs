//! Postgres backends. Two tables, `payments` keyed by `transaction_id` and
//! `ads` keyed by `id`; writes go through single statements so the database
//! owns the concurrency discipline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ad::AdRecord;
use crate::models::payment::PaymentRecord;
use crate::store::{AdStore, PaymentStore};

/// Connects to Postgres and bootstraps the schema.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    init_schema(&pool).await?;
    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the tables on startup if they do not exist yet.
async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            transaction_id   TEXT PRIMARY KEY,
            username         TEXT NOT NULL,
            user_email       TEXT NOT NULL,
            template_id      TEXT NOT NULL,
            status           TEXT NOT NULL,
            submitted_at     TIMESTAMPTZ NOT NULL,
            approved_at      TIMESTAMPTZ,
            expires_at       TIMESTAMPTZ,
            receipt_data_url TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ads (
            id         UUID PRIMARY KEY,
            brand_name TEXT NOT NULL,
            offer      TEXT NOT NULL,
            link_url   TEXT NOT NULL,
            image_url  TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn upsert(&self, record: PaymentRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (transaction_id, username, user_email, template_id, status,
                 submitted_at, approved_at, expires_at, receipt_data_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (transaction_id) DO UPDATE SET
                username = EXCLUDED.username,
                user_email = EXCLUDED.user_email,
                template_id = EXCLUDED.template_id,
                status = EXCLUDED.status,
                submitted_at = EXCLUDED.submitted_at,
                approved_at = EXCLUDED.approved_at,
                expires_at = EXCLUDED.expires_at,
                receipt_data_url = EXCLUDED.receipt_data_url
            "#,
        )
        .bind(&record.transaction_id)
        .bind(&record.username)
        .bind(&record.user_email)
        .bind(&record.template_id)
        .bind(record.status)
        .bind(record.submitted_at)
        .bind(record.approved_at)
        .bind(record.expires_at)
        .bind(&record.receipt_data_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let record = sqlx::query_as("SELECT * FROM payments WHERE transaction_id = $1")
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<PaymentRecord>, AppError> {
        let records = sqlx::query_as("SELECT * FROM payments WHERE username = $1")
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<PaymentRecord>, AppError> {
        let records = sqlx::query_as("SELECT * FROM payments ORDER BY submitted_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn approve(
        &self,
        transaction_id: &str,
        approved_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<PaymentRecord, AppError> {
        let record: Option<PaymentRecord> = sqlx::query_as(
            r#"
            UPDATE payments
            SET status = 'approved', approved_at = $2, expires_at = $3
            WHERE transaction_id = $1
            RETURNING *
            "#,
        )
        .bind(transaction_id)
        .bind(approved_at)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| AppError::NotFound(format!("payment {transaction_id} not found")))
    }
}

pub struct PgAdStore {
    pool: PgPool,
}

impl PgAdStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdStore for PgAdStore {
    async fn create(&self, ad: AdRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO ads (id, brand_name, offer, link_url, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(ad.id)
        .bind(&ad.brand_name)
        .bind(&ad.offer)
        .bind(&ad.link_url)
        .bind(&ad.image_url)
        .bind(ad.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM ads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("ad {id} not found")));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AdRecord>, AppError> {
        let ads = sqlx::query_as("SELECT * FROM ads ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(ads)
    }
}
