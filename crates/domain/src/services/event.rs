//! Event service: scheduling of shows, practices and recording sessions.
//!
//! Every operation requires an active membership in the band. Callers
//! without one get the same not-found error as for a missing band.

use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{
    CreateEventRequest, Event, EventPatch, Membership, NewEvent, UpdateEventRequest,
};
use crate::store::{EventStore, MembershipStore};

/// Upcoming events returned when no limit is given.
pub const DEFAULT_UPCOMING_LIMIT: i64 = 5;

/// Largest accepted upcoming-events limit.
pub const MAX_UPCOMING_LIMIT: i64 = 50;

pub struct EventService {
    events: Arc<dyn EventStore>,
    memberships: Arc<dyn MembershipStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>, memberships: Arc<dyn MembershipStore>) -> Self {
        Self {
            events,
            memberships,
        }
    }

    /// Schedule an event for `band_id`.
    pub async fn create_event(
        &self,
        band_id: Uuid,
        user_id: Uuid,
        request: CreateEventRequest,
    ) -> Result<Event, DomainError> {
        self.require_member(band_id, user_id).await?;

        let new = NewEvent {
            band_id,
            name: required_name(&request.name)?,
            description: optional_text(request.description),
            event_date: parse_event_date(&request.event_date)?,
            event_time: parse_event_time(request.event_time.as_deref())?,
            location: optional_text(request.location),
            event_type: request.event_type,
            created_by: user_id,
        };
        let event = self.events.insert_event(new).await?;

        info!(
            band_id = %band_id,
            event_id = %event.id,
            created_by = %user_id,
            event_type = %event.event_type,
            event_date = %event.event_date,
            "Event created"
        );
        Ok(event)
    }

    /// Events dated today (UTC) or later, soonest first.
    pub async fn list_upcoming_events(
        &self,
        band_id: Uuid,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
        if !(1..=MAX_UPCOMING_LIMIT).contains(&limit) {
            return Err(DomainError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_UPCOMING_LIMIT
            )));
        }
        self.require_member(band_id, user_id).await?;

        let today = Utc::now().date_naive();
        Ok(self
            .events
            .list_upcoming_events(band_id, today, limit)
            .await?)
    }

    pub async fn get_event(
        &self,
        band_id: Uuid,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Event, DomainError> {
        self.require_member(band_id, user_id).await?;
        self.find_band_event(band_id, event_id).await
    }

    /// Apply the fields present in `request`; an empty request returns the
    /// event unchanged.
    pub async fn update_event(
        &self,
        band_id: Uuid,
        event_id: Uuid,
        user_id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<Event, DomainError> {
        self.require_member(band_id, user_id).await?;
        let current = self.find_band_event(band_id, event_id).await?;

        let patch = EventPatch {
            name: request.name.as_deref().map(required_name).transpose()?,
            description: request.description.map(optional_text),
            event_date: request
                .event_date
                .as_deref()
                .map(parse_event_date)
                .transpose()?,
            event_time: request
                .event_time
                .map(|time| parse_event_time(time.as_deref()))
                .transpose()?,
            location: request.location.map(optional_text),
            event_type: request.event_type,
        };
        if patch.is_empty() {
            return Ok(current);
        }

        let event = self
            .events
            .update_event(event_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound("Event not found".to_string()))?;

        info!(band_id = %band_id, event_id = %event_id, user_id = %user_id, "Event updated");
        Ok(event)
    }

    pub async fn delete_event(
        &self,
        band_id: Uuid,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        self.require_member(band_id, user_id).await?;
        self.find_band_event(band_id, event_id).await?;

        if !self.events.delete_event(event_id).await? {
            return Err(DomainError::NotFound("Event not found".to_string()));
        }

        info!(band_id = %band_id, event_id = %event_id, user_id = %user_id, "Event deleted");
        Ok(())
    }

    async fn require_member(
        &self,
        band_id: Uuid,
        user_id: Uuid,
    ) -> Result<Membership, DomainError> {
        self.memberships
            .find_membership(band_id, user_id)
            .await?
            .filter(Membership::is_active)
            .ok_or_else(|| DomainError::NotFound("Band not found".to_string()))
    }

    /// Event ids from another band are reported as missing.
    async fn find_band_event(&self, band_id: Uuid, event_id: Uuid) -> Result<Event, DomainError> {
        self.events
            .find_event(event_id)
            .await?
            .filter(|event| event.band_id == band_id)
            .ok_or_else(|| DomainError::NotFound("Event not found".to_string()))
    }
}

fn required_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("Event name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Trimmed text; blank becomes `None`.
fn optional_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn parse_event_date(date: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        DomainError::Validation("event_date must be a YYYY-MM-DD date".to_string())
    })
}

/// `HH:MM` or `HH:MM:SS`; blank means all day.
fn parse_event_time(time: Option<&str>) -> Result<Option<NaiveTime>, DomainError> {
    let Some(time) = time.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map(Some)
        .map_err(|_| DomainError::Validation("event_time must be an HH:MM time".to_string()))
}
