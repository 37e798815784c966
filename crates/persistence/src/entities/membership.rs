//! Band membership entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{
    BandInfo, Membership, MembershipRole, MembershipStatus, PendingMembership,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for band_member_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "band_member_role", rename_all = "lowercase")]
pub enum MembershipRoleDb {
    Admin,
    Member,
}

impl From<MembershipRoleDb> for MembershipRole {
    fn from(db_role: MembershipRoleDb) -> Self {
        match db_role {
            MembershipRoleDb::Admin => MembershipRole::Admin,
            MembershipRoleDb::Member => MembershipRole::Member,
        }
    }
}

impl From<MembershipRole> for MembershipRoleDb {
    fn from(role: MembershipRole) -> Self {
        match role {
            MembershipRole::Admin => MembershipRoleDb::Admin,
            MembershipRole::Member => MembershipRoleDb::Member,
        }
    }
}

/// Database enum for band_member_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "band_member_status", rename_all = "lowercase")]
pub enum MembershipStatusDb {
    Pending,
    Active,
    Inactive,
}

impl From<MembershipStatusDb> for MembershipStatus {
    fn from(db_status: MembershipStatusDb) -> Self {
        match db_status {
            MembershipStatusDb::Pending => MembershipStatus::Pending,
            MembershipStatusDb::Active => MembershipStatus::Active,
            MembershipStatusDb::Inactive => MembershipStatus::Inactive,
        }
    }
}

impl From<MembershipStatus> for MembershipStatusDb {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Pending => MembershipStatusDb::Pending,
            MembershipStatus::Active => MembershipStatusDb::Active,
            MembershipStatus::Inactive => MembershipStatusDb::Inactive,
        }
    }
}

/// Database row mapping for the band_members table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipEntity {
    pub id: Uuid,
    pub band_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRoleDb,
    pub status: MembershipStatusDb,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

impl From<MembershipEntity> for Membership {
    fn from(entity: MembershipEntity) -> Self {
        Self {
            id: entity.id,
            band_id: entity.band_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            status: entity.status.into(),
            invited_by: entity.invited_by,
            joined_at: entity.joined_at,
        }
    }
}

/// Membership row joined with band display fields.
#[derive(Debug, Clone, FromRow)]
pub struct PendingMembershipEntity {
    pub id: Uuid,
    pub band_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRoleDb,
    pub status: MembershipStatusDb,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
    pub band_name: String,
    pub band_description: Option<String>,
}

impl From<PendingMembershipEntity> for PendingMembership {
    fn from(entity: PendingMembershipEntity) -> Self {
        Self {
            band: BandInfo {
                id: entity.band_id,
                name: entity.band_name,
                description: entity.band_description,
            },
            membership: Membership {
                id: entity.id,
                band_id: entity.band_id,
                user_id: entity.user_id,
                role: entity.role.into(),
                status: entity.status.into(),
                invited_by: entity.invited_by,
                joined_at: entity.joined_at,
            },
        }
    }
}
