//! Invitation repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    Invitation, InvitationStatus, InvitationWithBand, InvitationWithCreator, NewInvitation,
};
use domain::store::InvitationStore;
use domain::StoreError;

use crate::entities::{
    InvitationEntity, InvitationRoleDb, InvitationStatusDb, InvitationWithBandEntity,
    InvitationWithCreatorEntity,
};
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

const INVITATION_COLUMNS: &str = "i.id, i.band_id, i.invited_by, i.token, i.email, i.role, \
     i.max_uses, i.current_uses, i.expires_at, i.status, i.created_at";

/// Repository for the band_invitations table.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn insert_invitation(&self, new: NewInvitation) -> Result<Invitation, StoreError> {
        let timer = QueryTimer::new("insert_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO band_invitations (band_id, invited_by, token, email, role, max_uses, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, band_id, invited_by, token, email, role, max_uses, current_uses,
                      expires_at, status, created_at
            "#,
        )
        .bind(new.band_id)
        .bind(new.invited_by)
        .bind(&new.token)
        .bind(&new.email)
        .bind(InvitationRoleDb::from(new.role))
        .bind(new.max_uses)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn find_invitation_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InvitationWithBand>, StoreError> {
        let timer = QueryTimer::new("find_invitation_by_token");
        let query = format!(
            r#"
            SELECT {INVITATION_COLUMNS},
                   b.name AS band_name, b.description AS band_description
            FROM band_invitations i
            JOIN bands b ON b.id = i.band_id
            WHERE i.token = $1
            "#
        );
        let result = sqlx::query_as::<_, InvitationWithBandEntity>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn find_invitation_by_id(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        let timer = QueryTimer::new("find_invitation_by_id");
        let query = format!("SELECT {INVITATION_COLUMNS} FROM band_invitations i WHERE i.id = $1");
        let result = sqlx::query_as::<_, InvitationEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn mark_invitation_expired(&self, id: Uuid) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("mark_invitation_expired");
        let result = sqlx::query(
            r#"
            UPDATE band_invitations
            SET status = 'expired'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(map_sqlx_error)
    }

    async fn record_invitation_use(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        let timer = QueryTimer::new("record_invitation_use");
        // The WHERE clause re-checks the cap so concurrent writers cannot
        // overshoot it.
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            UPDATE band_invitations
            SET current_uses = current_uses + 1,
                status = CASE
                    WHEN max_uses IS NOT NULL
                         AND current_uses + 1 >= max_uses
                         AND status = 'pending'
                    THEN 'accepted'::invitation_status
                    ELSE status
                END
            WHERE id = $1 AND (max_uses IS NULL OR current_uses < max_uses)
            RETURNING id, band_id, invited_by, token, email, role, max_uses, current_uses,
                      expires_at, status, created_at
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

    async fn set_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
    ) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("set_invitation_status");
        let result = sqlx::query("UPDATE band_invitations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(InvitationStatusDb::from(status))
            .execute(&self.pool)
            .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(map_sqlx_error)
    }

    async fn list_band_invitations(
        &self,
        band_id: Uuid,
    ) -> Result<Vec<InvitationWithCreator>, StoreError> {
        let timer = QueryTimer::new("list_band_invitations");
        let query = format!(
            r#"
            SELECT {INVITATION_COLUMNS},
                   p.id AS creator_id, p.name AS creator_name, p.email AS creator_email
            FROM band_invitations i
            LEFT JOIN profiles p ON p.id = i.invited_by
            WHERE i.band_id = $1
            ORDER BY i.created_at DESC
            "#
        );
        let result = sqlx::query_as::<_, InvitationWithCreatorEntity>(&query)
            .bind(band_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }
}
