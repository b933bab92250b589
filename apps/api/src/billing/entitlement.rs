//! Entitlement evaluation: decides, per user and per template, whether
//! premium access is unlocked, pending admin review, or locked.
//!
//! The asymmetry is deliberate: an approval unlocks the whole tier the
//! purchased template belongs to (one payment buys the price bracket), while
//! a pending submission only marks the specific template the user paid for,
//! so the UI never shows a whole tier as "loading".

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::catalog;
use crate::errors::AppError;
use crate::identity::UserId;
use crate::models::payment::PaymentStatus;
use crate::store::PaymentStore;

/// How long an approval stays valid. Re-approval re-stamps the window.
pub fn unlock_window() -> Duration {
    Duration::hours(24)
}

/// How long a submission shows as pending before silently reverting to locked.
pub fn pending_window() -> Duration {
    Duration::minutes(5)
}

/// Derived view, computed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementView {
    pub is_unlocked: bool,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pending_until: Option<DateTime<Utc>>,
}

impl EntitlementView {
    fn locked() -> Self {
        Self {
            is_unlocked: false,
            pending_until: None,
        }
    }

    fn unlocked() -> Self {
        Self {
            is_unlocked: true,
            pending_until: None,
        }
    }

    fn pending(until: DateTime<Utc>) -> Self {
        Self {
            is_unlocked: false,
            pending_until: Some(until),
        }
    }
}

/// Evaluates entitlement for a (user, template) pair at `now`.
///
/// Absent or malformed lookups degrade to locked; the only error out of
/// here is a store failure. Both expiry windows are inclusive at their
/// boundary.
pub async fn evaluate(
    store: &dyn PaymentStore,
    identity: Option<&UserId>,
    template_id: &str,
    now: DateTime<Utc>,
) -> Result<EntitlementView, AppError> {
    let Some(tier) = catalog::tier_for(template_id) else {
        return Ok(EntitlementView::locked());
    };
    if tier.is_free() {
        return Ok(EntitlementView::unlocked());
    }
    let Some(user) = identity else {
        return Ok(EntitlementView::locked());
    };

    let records = store.list_by_username(user.as_str()).await?;

    // An approved record anywhere in the tier unlocks every sibling template.
    let has_active_approval = records.iter().any(|r| {
        r.status == PaymentStatus::Approved
            && tier.contains(&r.template_id)
            && r.expires_at.is_some_and(|expires| now <= expires)
    });
    if has_active_approval {
        return Ok(EntitlementView::unlocked());
    }

    // Pending is per-template: only the most recent submission for exactly
    // this template can show the pending badge.
    let latest_pending = records
        .iter()
        .filter(|r| r.status == PaymentStatus::Pending && r.template_id == template_id)
        .max_by_key(|r| r.submitted_at);
    if let Some(record) = latest_pending {
        let until = record.submitted_at + pending_window();
        if now <= until {
            return Ok(EntitlementView::pending(until));
        }
    }

    Ok(EntitlementView::locked())
}
