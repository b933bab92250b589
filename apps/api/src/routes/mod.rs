pub mod health;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};

use crate::ads;
use crate::auth;
use crate::billing::handlers;
use crate::catalog;
use crate::enhance;
use crate::state::AppState;

/// GET /api/v1/templates
/// Serves the static tier catalog.
async fn list_templates() -> Json<&'static [catalog::TierDefinition]> {
    Json(catalog::TIERS)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template catalog
        .route("/api/v1/templates", get(list_templates))
        // Entitlement API
        .route("/api/v1/entitlements", get(handlers::handle_get_entitlement))
        .route("/api/v1/entitlements/watch", get(handlers::handle_watch))
        // Payments
        .route("/api/v1/payments", post(handlers::handle_submit_payment))
        // Admin
        .route("/api/v1/admin/login", post(auth::handle_admin_login))
        .route("/api/v1/admin/payments", get(handlers::handle_list_payments))
        .route(
            "/api/v1/admin/payments/:transaction_id/approve",
            post(handlers::handle_approve_payment),
        )
        .route("/api/v1/admin/users", get(handlers::handle_list_users))
        .route("/api/v1/admin/ads", post(ads::handle_create_ad))
        .route("/api/v1/admin/ads/:id", delete(ads::handle_delete_ad))
        // Ads (public read)
        .route("/api/v1/ads", get(ads::handle_list_ads))
        // AI feedback
        .route("/api/v1/enhance", post(enhance::handle_enhance))
        .with_state(state)
}
