//! Ad ledger: promotional slots shown in the builder UI. Structurally a
//! sibling of the payment ledger but with no bearing on entitlement:
//! created and deleted by admin action, never mutated, no expiry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ad::AdRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdRequest {
    pub brand_name: String,
    #[serde(default)]
    pub offer: String,
    pub link_url: String,
    pub image_url: String,
}

fn validate(request: &CreateAdRequest) -> Result<(), AppError> {
    if request.brand_name.trim().is_empty() {
        return Err(AppError::Validation("brandName is required".to_string()));
    }
    if request.link_url.trim().is_empty() {
        return Err(AppError::Validation("linkUrl is required".to_string()));
    }
    if request.image_url.trim().is_empty() {
        return Err(AppError::Validation("imageUrl is required".to_string()));
    }
    Ok(())
}

/// GET /api/v1/ads (public) returns ads newest first.
pub async fn handle_list_ads(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdRecord>>, AppError> {
    let ads = state.ads.list().await?;
    Ok(Json(ads))
}

/// POST /api/v1/admin/ads
pub async fn handle_create_ad(
    State(state): State<AppState>,
    Json(request): Json<CreateAdRequest>,
) -> Result<Json<AdRecord>, AppError> {
    validate(&request)?;
    let ad = AdRecord {
        id: Uuid::new_v4(),
        brand_name: request.brand_name,
        offer: request.offer,
        link_url: request.link_url,
        image_url: request.image_url,
        created_at: Utc::now(),
    };
    state.ads.create(ad.clone()).await?;
    Ok(Json(ad))
}

/// DELETE /api/v1/admin/ads/:id returns 404 if the ad does not exist.
pub async fn handle_delete_ad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> CreateAdRequest {
        CreateAdRequest {
            brand_name: "Acme".to_string(),
            offer: "10% off".to_string(),
            link_url: "https://acme.example".to_string(),
            image_url: "https://acme.example/banner.png".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&make_request()).is_ok());
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        for field in ["brand", "link", "image"] {
            let mut request = make_request();
            match field {
                "brand" => request.brand_name = " ".to_string(),
                "link" => request.link_url = String::new(),
                _ => request.image_url = String::new(),
            }
            assert!(matches!(
                validate(&request),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_offer_may_be_empty() {
        let mut request = make_request();
        request.offer = String::new();
        assert!(validate(&request).is_ok());
    }
}
