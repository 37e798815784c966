//! Event repository for database operations.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Event, EventPatch, NewEvent};
use domain::store::EventStore;
use domain::StoreError;

use crate::entities::{EventEntity, EventTypeDb};
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for the events table.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn insert_event(&self, new: NewEvent) -> Result<Event, StoreError> {
        let timer = QueryTimer::new("insert_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events
                (band_id, name, description, event_date, event_time, location, type, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, band_id, name, description, event_date, event_time, location, type,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(new.band_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.event_date)
        .bind(new.event_time)
        .bind(&new.location)
        .bind(EventTypeDb::from(new.event_type))
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let timer = QueryTimer::new("find_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, band_id, name, description, event_date, event_time, location, type,
                   created_by, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn list_upcoming_events(
        &self,
        band_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, StoreError> {
        let timer = QueryTimer::new("list_upcoming_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, band_id, name, description, event_date, event_time, location, type,
                   created_by, created_at, updated_at
            FROM events
            WHERE band_id = $1 AND event_date >= $2
            ORDER BY event_date ASC, event_time ASC NULLS FIRST, created_at ASC
            LIMIT $3
            "#,
        )
        .bind(band_id)
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }

    async fn update_event(
        &self,
        id: Uuid,
        patch: EventPatch,
    ) -> Result<Option<Event>, StoreError> {
        let timer = QueryTimer::new("update_event");
        // Nullable columns take a flag so that an explicit clear can be told
        // apart from "leave unchanged".
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                event_date = COALESCE($5, event_date),
                event_time = CASE WHEN $6 THEN $7 ELSE event_time END,
                location = CASE WHEN $8 THEN $9 ELSE location END,
                type = COALESCE($10, type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, band_id, name, description, event_date, event_time, location, type,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.event_date)
        .bind(patch.event_time.is_some())
        .bind(patch.event_time.flatten())
        .bind(patch.location.is_some())
        .bind(patch.location.clone().flatten())
        .bind(patch.event_type.map(EventTypeDb::from))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(map_sqlx_error)
    }
}
