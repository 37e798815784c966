//! Event entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::{Event, EventType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for event_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
pub enum EventTypeDb {
    Show,
    Practice,
    Recording,
    Other,
}

impl From<EventTypeDb> for EventType {
    fn from(db_type: EventTypeDb) -> Self {
        match db_type {
            EventTypeDb::Show => EventType::Show,
            EventTypeDb::Practice => EventType::Practice,
            EventTypeDb::Recording => EventType::Recording,
            EventTypeDb::Other => EventType::Other,
        }
    }
}

impl From<EventType> for EventTypeDb {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Show => EventTypeDb::Show,
            EventType::Practice => EventTypeDb::Practice,
            EventType::Recording => EventTypeDb::Recording,
            EventType::Other => EventTypeDb::Other,
        }
    }
}

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub band_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    #[sqlx(rename = "type")]
    pub event_type: EventTypeDb,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            band_id: entity.band_id,
            name: entity.name,
            description: entity.description,
            event_date: entity.event_date,
            event_time: entity.event_time,
            location: entity.location,
            event_type: entity.event_type.into(),
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
