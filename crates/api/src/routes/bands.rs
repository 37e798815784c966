//! Band routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::band::{CreateBandRequest, ListBandsResponse};
use domain::models::Band;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Create a band; the caller becomes its admin.
///
/// POST /api/v1/bands
pub async fn create_band(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateBandRequest>,
) -> Result<(StatusCode, Json<Band>), ApiError> {
    request.validate()?;

    let band = state
        .bands
        .create_band(
            &request.name,
            request.description,
            request.photo_url,
            user_auth.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(band)))
}

/// Bands the caller is an active member of.
///
/// GET /api/v1/bands
pub async fn list_bands(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListBandsResponse>, ApiError> {
    let data = state.bands.list_user_bands(user_auth.user_id).await?;
    Ok(Json(ListBandsResponse { data }))
}
