//! Axum route handlers for the billing API: entitlement queries, payment
//! submission, admin review, and the ledger event stream.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::Utc;
use futures::stream::Stream;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;

use crate::billing::entitlement::{evaluate, EntitlementView};
use crate::billing::ledger::{approve_payment, derive_users, submit_payment, SubmitPaymentRequest};
use crate::errors::AppError;
use crate::models::payment::{PaymentRecord, UserSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementQuery {
    #[serde(default)]
    pub username: Option<String>,
    pub template_id: String,
}

/// GET /api/v1/entitlements?username=&templateId=
///
/// Evaluates the caller's entitlement for one template. Anonymous callers
/// and unknown templates come back locked rather than erroring.
pub async fn handle_get_entitlement(
    State(state): State<AppState>,
    Query(query): Query<EntitlementQuery>,
) -> Result<Json<EntitlementView>, AppError> {
    let identity = state.identity.resolve(query.username.as_deref());
    let view = evaluate(
        state.payments.as_ref(),
        identity.as_ref(),
        &query.template_id,
        Utc::now(),
    )
    .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct WatchQuery {
    #[serde(default)]
    pub username: Option<String>,
}

/// GET /api/v1/entitlements/watch?username=
///
/// Server-sent events for ledger changes, optionally filtered to one
/// username, so clients refresh on push instead of polling on a timer.
/// A lagged subscriber skips missed events and keeps going.
pub async fn handle_watch(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let username = state
        .identity
        .resolve(query.username.as_deref())
        .map(|id| id.as_str().to_string());
    let rx = state.events.subscribe();

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .filter_map(move |event| {
        let matches = username.as_deref().map_or(true, |u| event.username == u);
        let item = matches
            .then(|| serde_json::to_string(&event).ok())
            .flatten()
            .map(|json| Ok(Event::default().event("ledger").data(json)));
        futures::future::ready(item)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// POST /api/v1/payments
pub async fn handle_submit_payment(
    State(state): State<AppState>,
    Json(request): Json<SubmitPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    submit_payment(state.payments.as_ref(), &state.events, request, Utc::now()).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/v1/admin/payments/:transaction_id/approve
///
/// 404 if no submission matches. Re-approving is allowed and renews the
/// 24-hour grant.
pub async fn handle_approve_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    approve_payment(
        state.payments.as_ref(),
        &state.events,
        &transaction_id,
        Utc::now(),
    )
    .await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/v1/admin/payments
///
/// All submissions, newest first.
pub async fn handle_list_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentRecord>>, AppError> {
    let records = state.payments.list_all().await?;
    Ok(Json(records))
}

/// GET /api/v1/admin/users
///
/// The user directory derived from the ledger.
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let records = state.payments.list_all().await?;
    Ok(Json(derive_users(&records)))
}
