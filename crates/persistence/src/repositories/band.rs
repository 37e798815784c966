//! Band repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Band, BandSummary, NewBand};
use domain::store::BandStore;
use domain::StoreError;

use crate::entities::{BandEntity, BandWithRoleEntity};
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for the bands table.
#[derive(Clone)]
pub struct BandRepository {
    pool: PgPool,
}

impl BandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BandStore for BandRepository {
    async fn insert_band(&self, new: NewBand) -> Result<Band, StoreError> {
        let timer = QueryTimer::new("insert_band");
        let result = sqlx::query_as::<_, BandEntity>(
            r#"
            INSERT INTO bands (name, description, photo_url, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, photo_url, created_by, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.photo_url)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn find_band(&self, id: Uuid) -> Result<Option<Band>, StoreError> {
        let timer = QueryTimer::new("find_band");
        let result = sqlx::query_as::<_, BandEntity>(
            r#"
            SELECT id, name, description, photo_url, created_by, created_at, updated_at
            FROM bands
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

    async fn list_user_bands(&self, user_id: Uuid) -> Result<Vec<BandSummary>, StoreError> {
        let timer = QueryTimer::new("list_user_bands");
        let result = sqlx::query_as::<_, BandWithRoleEntity>(
            r#"
            SELECT b.id, b.name, b.description, b.photo_url, b.created_by,
                   b.created_at, b.updated_at, m.role AS your_role
            FROM bands b
            JOIN band_members m ON m.band_id = b.id
            WHERE m.user_id = $1 AND m.status = 'active'
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }
}
