//! Band entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Band, BandSummary};
use sqlx::FromRow;
use uuid::Uuid;

use super::membership::MembershipRoleDb;

/// Database row mapping for the bands table.
#[derive(Debug, Clone, FromRow)]
pub struct BandEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BandEntity> for Band {
    fn from(entity: BandEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            photo_url: entity.photo_url,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Band row joined with the caller's membership role.
#[derive(Debug, Clone, FromRow)]
pub struct BandWithRoleEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub your_role: MembershipRoleDb,
}

impl From<BandWithRoleEntity> for BandSummary {
    fn from(entity: BandWithRoleEntity) -> Self {
        Self {
            band: Band {
                id: entity.id,
                name: entity.name,
                description: entity.description,
                photo_url: entity.photo_url,
                created_by: entity.created_by,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            your_role: entity.your_role.into(),
        }
    }
}
