//! Event routes: a band's schedule of shows, practices and recording
//! sessions. Every active member may read and edit it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateEventRequest, Event, ListEventsResponse, UpdateEventRequest};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_event_changed;

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/bands/:band_id/events
pub async fn create_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(band_id): Path<Uuid>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate()?;
    let event = state
        .events
        .create_event(band_id, user_auth.user_id, request)
        .await?;
    record_event_changed("created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// Upcoming events, soonest first. `limit` defaults to 5.
///
/// GET /api/v1/bands/:band_id/events?limit=
pub async fn list_upcoming_events(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(band_id): Path<Uuid>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    let data = state
        .events
        .list_upcoming_events(band_id, user_auth.user_id, query.limit)
        .await?;
    Ok(Json(ListEventsResponse { data }))
}

/// GET /api/v1/bands/:band_id/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((band_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .events
        .get_event(band_id, event_id, user_auth.user_id)
        .await?;
    Ok(Json(event))
}

/// PATCH /api/v1/bands/:band_id/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((band_id, event_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    request.validate()?;
    let event = state
        .events
        .update_event(band_id, event_id, user_auth.user_id, request)
        .await?;
    record_event_changed("updated");
    Ok(Json(event))
}

/// DELETE /api/v1/bands/:band_id/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((band_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .events
        .delete_event(band_id, event_id, user_auth.user_id)
        .await?;
    record_event_changed("deleted");
    Ok(StatusCode::NO_CONTENT)
}
