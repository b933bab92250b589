//! Payment ledger operations: submission upsert, admin approval, and the
//! user directory derived from the ledger (the system has no user table).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::billing::entitlement::unlock_window;
use crate::catalog;
use crate::errors::AppError;
use crate::events::{LedgerEvent, LedgerEventKind, LedgerEvents};
use crate::models::payment::{PaymentRecord, PaymentStatus, UserSummary};
use crate::store::PaymentStore;

/// Placeholder stored when the submitter gives no email.
pub const EMAIL_SENTINEL: &str = "not-provided";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentRequest {
    pub username: String,
    pub transaction_id: String,
    #[serde(default)]
    pub user_email: Option<String>,
    pub template_id: String,
    pub receipt_data_url: String,
}

/// Upserts a submission into the ledger keyed by transaction id.
///
/// Resubmission under a known id overwrites the mutable fields and resets
/// the record to pending, clearing any prior approval stamps. The receipt
/// contents and the transaction id's authenticity are not verified; the
/// admin review is the verification step.
pub async fn submit_payment(
    store: &dyn PaymentStore,
    events: &LedgerEvents,
    request: SubmitPaymentRequest,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    let transaction_id = request.transaction_id.trim().to_string();
    if transaction_id.is_empty() {
        return Err(AppError::Validation("transactionId is required".to_string()));
    }
    if request.receipt_data_url.is_empty() {
        return Err(AppError::Validation("receiptDataUrl is required".to_string()));
    }
    if !catalog::is_known_template(&request.template_id) {
        return Err(AppError::Validation(format!(
            "unknown template '{}'",
            request.template_id
        )));
    }

    let user_email = match request.user_email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => EMAIL_SENTINEL.to_string(),
    };

    let record = PaymentRecord {
        username: username.clone(),
        user_email,
        transaction_id: transaction_id.clone(),
        template_id: request.template_id.clone(),
        status: PaymentStatus::Pending,
        submitted_at: now,
        approved_at: None,
        expires_at: None,
        receipt_data_url: request.receipt_data_url,
    };
    store.upsert(record).await?;

    info!(
        username = %username,
        transaction_id = %transaction_id,
        template_id = %request.template_id,
        "payment submitted"
    );
    events.publish(LedgerEvent {
        kind: LedgerEventKind::Submitted,
        username,
        template_id: request.template_id,
        at: now,
    });

    Ok(())
}

/// Approves the submission with the given transaction id, granting a
/// 24-hour unlock from `now`. Re-approving an already-approved record
/// re-stamps the window, silently renewing the grant.
pub async fn approve_payment(
    store: &dyn PaymentStore,
    events: &LedgerEvents,
    transaction_id: &str,
    now: DateTime<Utc>,
) -> Result<PaymentRecord, AppError> {
    let record = store
        .approve(transaction_id, now, now + unlock_window())
        .await?;

    info!(
        username = %record.username,
        transaction_id = %transaction_id,
        template_id = %record.template_id,
        "payment approved"
    );
    events.publish(LedgerEvent {
        kind: LedgerEventKind::Approved,
        username: record.username.clone(),
        template_id: record.template_id.clone(),
        at: now,
    });

    Ok(record)
}

/// Derives the user directory from ledger records: one row per username,
/// `first_seen` from the earliest submission, email from the earliest
/// submission that carried one (the sentinel is upgraded by a later real
/// email). Sorted newest-first.
pub fn derive_users(records: &[PaymentRecord]) -> Vec<UserSummary> {
    let mut by_submission: Vec<&PaymentRecord> = records.iter().collect();
    by_submission.sort_by_key(|r| r.submitted_at);

    let mut users: Vec<UserSummary> = Vec::new();
    for record in by_submission {
        match users.iter_mut().find(|u| u.username == record.username) {
            Some(user) => {
                if user.email == EMAIL_SENTINEL && record.user_email != EMAIL_SENTINEL {
                    user.email = record.user_email.clone();
                }
            }
            None => users.push(UserSummary {
                username: record.username.clone(),
                email: record.user_email.clone(),
                first_seen: record.submitted_at,
            }),
        }
    }

    users.sort_by(|a, b| b.first_seen.cmp(&a.first_seen));
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryPaymentStore;
    use chrono::Duration;

    fn make_request(transaction_id: &str, template_id: &str) -> SubmitPaymentRequest {
        SubmitPaymentRequest {
            username: "alice".to_string(),
            transaction_id: transaction_id.to_string(),
            user_email: Some("alice@example.com".to_string()),
            template_id: template_id.to_string(),
            receipt_data_url: "data:image/png;base64,AAAA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_record() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let now = Utc::now();

        submit_payment(&store, &events, make_request("tx1", "modern"), now)
            .await
            .unwrap();

        let record = store.find_by_transaction_id("tx1").await.unwrap().unwrap();
        assert_eq!(record.status, PaymentStatus::Pending);
        assert_eq!(record.submitted_at, now);
        assert_eq!(record.approved_at, None);
        assert_eq!(record.expires_at, None);
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_fields() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let now = Utc::now();

        let mut request = make_request("tx1", "modern");
        request.username = "  ".to_string();
        let err = submit_payment(&store, &events, request, now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut request = make_request("tx1", "modern");
        request.receipt_data_url = String::new();
        let err = submit_payment(&store, &events, request, now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_unknown_template() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let err = submit_payment(
            &store,
            &events,
            make_request("tx1", "no-such-template"),
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_defaults_missing_email_to_sentinel() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let mut request = make_request("tx1", "modern");
        request.user_email = None;

        submit_payment(&store, &events, request, Utc::now()).await.unwrap();
        let record = store.find_by_transaction_id("tx1").await.unwrap().unwrap();
        assert_eq!(record.user_email, EMAIL_SENTINEL);
    }

    #[tokio::test]
    async fn test_resubmission_resets_approved_record_to_pending() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let t0 = Utc::now();

        submit_payment(&store, &events, make_request("tx1", "modern"), t0)
            .await
            .unwrap();
        approve_payment(&store, &events, "tx1", t0).await.unwrap();

        let t1 = t0 + Duration::minutes(2);
        submit_payment(&store, &events, make_request("tx1", "modern"), t1)
            .await
            .unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1, "resubmission must overwrite, not append");
        assert_eq!(all[0].status, PaymentStatus::Pending);
        assert_eq!(all[0].submitted_at, t1);
        assert_eq!(all[0].approved_at, None);
        assert_eq!(all[0].expires_at, None);
    }

    #[tokio::test]
    async fn test_approve_stamps_24h_expiry() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let now = Utc::now();

        submit_payment(&store, &events, make_request("tx1", "modern"), now)
            .await
            .unwrap();
        let record = approve_payment(&store, &events, "tx1", now).await.unwrap();
        assert_eq!(record.status, PaymentStatus::Approved);
        assert_eq!(record.expires_at, Some(now + unlock_window()));
    }

    #[tokio::test]
    async fn test_reapprove_renews_the_window() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let t0 = Utc::now();

        submit_payment(&store, &events, make_request("tx1", "modern"), t0)
            .await
            .unwrap();
        approve_payment(&store, &events, "tx1", t0).await.unwrap();

        let t1 = t0 + Duration::hours(12);
        let record = approve_payment(&store, &events, "tx1", t1).await.unwrap();
        assert_eq!(record.expires_at, Some(t1 + unlock_window()));
    }

    #[tokio::test]
    async fn test_approve_unknown_id_is_not_found() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let err = approve_payment(&store, &events, "does-not-exist", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_and_approve_publish_events() {
        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let mut rx = events.subscribe();
        let now = Utc::now();

        submit_payment(&store, &events, make_request("tx1", "modern"), now)
            .await
            .unwrap();
        approve_payment(&store, &events, "tx1", now).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().kind, LedgerEventKind::Submitted);
        let approved = rx.recv().await.unwrap();
        assert_eq!(approved.kind, LedgerEventKind::Approved);
        assert_eq!(approved.template_id, "modern");
    }

    #[tokio::test]
    async fn test_submit_then_approve_unlocks_the_tier() {
        use crate::billing::entitlement::{evaluate, pending_window};
        use crate::identity::UserId;

        let store = MemoryPaymentStore::new();
        let events = LedgerEvents::new();
        let alice = UserId("alice".to_string());
        let now = Utc::now();

        submit_payment(&store, &events, make_request("tx1", "modern"), now)
            .await
            .unwrap();

        let view = evaluate(&store, Some(&alice), "modern", now).await.unwrap();
        assert!(!view.is_unlocked);
        assert_eq!(view.pending_until, Some(now + pending_window()));

        approve_payment(&store, &events, "tx1", now).await.unwrap();

        let view = evaluate(&store, Some(&alice), "modern", now).await.unwrap();
        assert!(view.is_unlocked);

        // "creative" shares the Standard tier with "modern".
        let sibling = evaluate(&store, Some(&alice), "creative", now).await.unwrap();
        assert!(sibling.is_unlocked);
    }

    #[test]
    fn test_derive_users_earliest_submission_wins() {
        let base = Utc::now();
        let records = vec![
            PaymentRecord {
                username: "alice".to_string(),
                user_email: EMAIL_SENTINEL.to_string(),
                transaction_id: "tx1".to_string(),
                template_id: "modern".to_string(),
                status: PaymentStatus::Pending,
                submitted_at: base,
                approved_at: None,
                expires_at: None,
                receipt_data_url: String::new(),
            },
            PaymentRecord {
                username: "alice".to_string(),
                user_email: "alice@example.com".to_string(),
                transaction_id: "tx2".to_string(),
                template_id: "elegant".to_string(),
                status: PaymentStatus::Pending,
                submitted_at: base + Duration::hours(1),
                approved_at: None,
                expires_at: None,
                receipt_data_url: String::new(),
            },
            PaymentRecord {
                username: "bob".to_string(),
                user_email: "bob@example.com".to_string(),
                transaction_id: "tx3".to_string(),
                template_id: "modern".to_string(),
                status: PaymentStatus::Pending,
                submitted_at: base + Duration::hours(2),
                approved_at: None,
                expires_at: None,
                receipt_data_url: String::new(),
            },
        ];

        let users = derive_users(&records);
        assert_eq!(users.len(), 2);
        // Newest first: bob was first seen after alice.
        assert_eq!(users[0].username, "bob");
        assert_eq!(users[1].username, "alice");
        assert_eq!(users[1].first_seen, base);
        // Sentinel upgraded by the later real email.
        assert_eq!(users[1].email, "alice@example.com");
    }
}
