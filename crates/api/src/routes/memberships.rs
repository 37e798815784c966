//! Membership routes: direct email invitations and the invitee's pending
//! inbox.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::membership::{InviteMemberRequest, ListPendingMembershipsResponse};
use domain::models::Membership;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Invite a registered user by email.
///
/// POST /api/v1/bands/:band_id/members/invite
pub async fn invite_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(band_id): Path<Uuid>,
    Json(request): Json<InviteMemberRequest>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    request.validate()?;
    state
        .bands
        .require_band_admin(band_id, user_auth.user_id)
        .await?;

    let membership = state
        .memberships
        .invite_member_by_email(band_id, &request.email, user_auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// GET /api/v1/memberships/pending
pub async fn list_pending(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListPendingMembershipsResponse>, ApiError> {
    let data = state
        .memberships
        .list_pending_memberships(user_auth.user_id)
        .await?;
    Ok(Json(ListPendingMembershipsResponse { data }))
}

/// POST /api/v1/memberships/:membership_id/confirm
pub async fn confirm_membership(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(membership_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .memberships
        .confirm_membership(membership_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/memberships/:membership_id
pub async fn decline_membership(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(membership_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .memberships
        .decline_membership(membership_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
