//! Invitation routes: link creation and management for band admins, token
//! lookup and acceptance for recipients.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    AcceptInvitationRequest, AcceptOutcome, CreateInvitationRequest, CreateInvitationResponse,
    ListInvitationsResponse, TokenValidation, ValidateInvitationResponse,
};
use domain::DomainError;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OptionalUserAuth, UserAuth};
use crate::middleware::metrics::{
    record_invitation_accepted, record_invitation_created, record_invitation_revoked,
    record_invitation_validated,
};

/// Create an invitation link for a band.
///
/// POST /api/v1/bands/:band_id/invitations
///
/// Only active band admins can create invitations. Fields left out of the
/// body take the configured defaults; an explicit `null` for `max_uses` or
/// `expires_in_days` means unlimited / never.
pub async fn create_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(band_id): Path<Uuid>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<CreateInvitationResponse>), ApiError> {
    request.validate()?;
    state
        .bands
        .require_band_admin(band_id, user_auth.user_id)
        .await?;

    let options = request.into_options_with(state.config.invites.defaults());
    let invitation = state
        .invitations
        .create_invitation(band_id, user_auth.user_id, options)
        .await?;
    record_invitation_created();

    let invite_url = state.invitations.generate_invite_url(&invitation.token);

    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationResponse {
            invitation,
            invite_url,
        }),
    ))
}

/// List every invitation of a band, newest first.
///
/// GET /api/v1/bands/:band_id/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(band_id): Path<Uuid>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    state
        .bands
        .require_band_admin(band_id, user_auth.user_id)
        .await?;

    let data = state.invitations.get_band_invitations(band_id).await?;
    Ok(Json(ListInvitationsResponse { data }))
}

/// Revoke an invitation.
///
/// DELETE /api/v1/bands/:band_id/invitations/:invitation_id
pub async fn revoke_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((band_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .bands
        .require_band_admin(band_id, user_auth.user_id)
        .await?;

    let invitation = state.invitations.get_invitation(invitation_id).await?;
    if invitation.band_id != band_id {
        return Err(ApiError::NotFound("Invitation not found".to_string()));
    }

    state.invitations.revoke_invitation(invitation_id).await?;
    record_invitation_revoked();

    info!(
        band_id = %band_id,
        invitation_id = %invitation_id,
        user_id = %user_auth.user_id,
        "Invitation revoked via API"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Check a token before sign-in. Public; an invalid token is reported in the
/// body rather than as an error status.
///
/// GET /api/v1/invitations/:token
pub async fn validate_invitation(
    State(state): State<AppState>,
    OptionalUserAuth(viewer): OptionalUserAuth,
    Path(token): Path<String>,
) -> Result<Json<ValidateInvitationResponse>, ApiError> {
    let validation = state.invitations.validate_invite_token(&token).await?;

    let result = match &validation {
        TokenValidation::Valid(_) => "valid",
        TokenValidation::Invalid(reason) => reason.code(),
    };
    record_invitation_validated(result);
    tracing::debug!(
        result,
        authenticated = viewer.is_some(),
        "Invitation token checked"
    );

    Ok(Json(validation.into()))
}

/// Accept an invitation as the authenticated user.
///
/// POST /api/v1/invitations/:token/accept
///
/// Body `{"is_new_signup": true}` when the account was just created through
/// the invitation link; an empty body means an existing account. A body that
/// is present but not valid JSON is rejected.
pub async fn accept_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<Json<AcceptOutcome>, ApiError> {
    let request = parse_accept_body(&body)?;

    let result = state
        .invitations
        .accept_invitation(&token, user_auth.user_id, request.is_new_signup)
        .await;

    match &result {
        Ok(outcome) if outcome.already_member => record_invitation_accepted("already_member"),
        Ok(outcome) if outcome.is_pending => record_invitation_accepted("pending"),
        Ok(_) => record_invitation_accepted("joined"),
        Err(DomainError::InvalidInvitation(reason)) => record_invitation_accepted(reason.code()),
        Err(_) => {}
    }

    Ok(Json(result?))
}

fn parse_accept_body(body: &[u8]) -> Result<AcceptInvitationRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AcceptInvitationRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))
}
