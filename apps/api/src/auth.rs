//! Admin login: a static credential comparison against configured values.
//! No session or token is issued; the consuming UI keeps its own flag.
//! Deliberately unhardened (see the product's scope notes).

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
}

pub fn check_credentials(
    email: &str,
    password: &str,
    expected_email: &str,
    expected_password: &str,
) -> bool {
    email == expected_email && password == expected_password
}

/// POST /api/v1/admin/login
pub async fn handle_admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Json<AdminLoginResponse> {
    let success = check_credentials(
        &request.email,
        &request.password,
        &state.config.admin_email,
        &state.config.admin_password,
    );
    if !success {
        warn!(email = %request.email, "failed admin login attempt");
    }
    Json(AdminLoginResponse { success })
}
