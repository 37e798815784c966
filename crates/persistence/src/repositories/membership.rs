//! Membership repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Membership, MembershipPatch, NewMembership, PendingMembership};
use domain::store::MembershipStore;
use domain::StoreError;

use crate::entities::{
    MembershipEntity, MembershipRoleDb, MembershipStatusDb, PendingMembershipEntity,
};
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for the band_members table.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn find_membership(
        &self,
        band_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        let timer = QueryTimer::new("find_membership");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT id, band_id, user_id, role, status, invited_by, joined_at
            FROM band_members
            WHERE band_id = $1 AND user_id = $2
            "#,
        )
        .bind(band_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>, StoreError> {
        let timer = QueryTimer::new("find_membership_by_id");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT id, band_id, user_id, role, status, invited_by, joined_at
            FROM band_members
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

    async fn insert_membership(&self, new: NewMembership) -> Result<Membership, StoreError> {
        let timer = QueryTimer::new("insert_membership");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            INSERT INTO band_members (band_id, user_id, role, status, invited_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, band_id, user_id, role, status, invited_by, joined_at
            "#,
        )
        .bind(new.band_id)
        .bind(new.user_id)
        .bind(MembershipRoleDb::from(new.role))
        .bind(MembershipStatusDb::from(new.status))
        .bind(new.invited_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn update_membership(
        &self,
        id: Uuid,
        patch: MembershipPatch,
    ) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("update_membership");
        let result = sqlx::query(
            r#"
            UPDATE band_members
            SET status = COALESCE($2, status),
                role = COALESCE($3, role)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.status.map(MembershipStatusDb::from))
        .bind(patch.role.map(MembershipRoleDb::from))
        .execute(&self.pool)
        .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(map_sqlx_error)
    }

    async fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("delete_membership");
        let result = sqlx::query("DELETE FROM band_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(map_sqlx_error)
    }

    async fn list_pending_memberships(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingMembership>, StoreError> {
        let timer = QueryTimer::new("list_pending_memberships");
        let result = sqlx::query_as::<_, PendingMembershipEntity>(
            r#"
            SELECT m.id, m.band_id, m.user_id, m.role, m.status, m.invited_by, m.joined_at,
                   b.name AS band_name, b.description AS band_description
            FROM band_members m
            JOIN bands b ON b.id = m.band_id
            WHERE m.user_id = $1 AND m.status = 'pending'
            ORDER BY m.joined_at DESC
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
