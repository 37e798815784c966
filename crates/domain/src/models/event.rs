//! Band event (show, practice, recording) models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::invitation::present;

/// Kind of a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Show,
    Practice,
    Recording,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Show => "show",
            EventType::Practice => "practice",
            EventType::Recording => "recording",
            EventType::Other => "other",
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "show" => Ok(EventType::Show),
            "practice" => Ok(EventType::Practice),
            "recording" => Ok(EventType::Recording),
            "other" => Ok(EventType::Other),
            _ => Err(format!("Invalid event type: {}", s)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled band event. `event_time` is absent for all-day entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub band_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Soonest first; all-day entries before timed ones on the same date.
    pub fn schedule_key(&self) -> (NaiveDate, Option<NaiveTime>, DateTime<Utc>) {
        (self.event_date, self.event_time, self.created_at)
    }
}

/// Values for inserting an event row. Text fields are already trimmed.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub band_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub event_type: EventType,
    pub created_by: Uuid,
}

/// Partial update of an event. For the nullable columns `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<Option<NaiveTime>>,
    pub location: Option<Option<String>>,
    pub event_type: Option<EventType>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Request payload for scheduling an event.
///
/// Date and time arrive as `YYYY-MM-DD` and `HH:MM` strings and are parsed by
/// the event service; an empty `event_time` means all day.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub event_date: String,

    pub event_time: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    #[serde(rename = "type")]
    pub event_type: EventType,
}

/// Request payload for editing an event. Absent fields are left unchanged;
/// `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    pub event_date: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub event_time: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,

    #[serde(default, rename = "type")]
    pub event_type: Option<EventType>,
}

/// Response for listing upcoming events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEventsResponse {
    pub data: Vec<Event>,
}
