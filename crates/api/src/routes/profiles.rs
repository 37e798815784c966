//! Profile lookup route.

use axum::extract::{Query, State};
use axum::Json;
use domain::models::profile::UserLookupResponse;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: String,
}

/// Check whether an account exists for an email.
///
/// GET /api/v1/profiles/lookup?email=
pub async fn lookup_user(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<LookupQuery>,
) -> Result<Json<UserLookupResponse>, ApiError> {
    let user_id = state.invitations.check_user_exists(&query.email).await;
    Ok(Json(UserLookupResponse {
        exists: user_id.is_some(),
        user_id,
    }))
}
