//! Band invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{
    BandInfo, CreatorInfo, Invitation, InvitationRole, InvitationStatus, InvitationWithBand,
    InvitationWithCreator,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invitation_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_role", rename_all = "lowercase")]
pub enum InvitationRoleDb {
    Owner,
    Member,
}

impl From<InvitationRoleDb> for InvitationRole {
    fn from(db_role: InvitationRoleDb) -> Self {
        match db_role {
            InvitationRoleDb::Owner => InvitationRole::Owner,
            InvitationRoleDb::Member => InvitationRole::Member,
        }
    }
}

impl From<InvitationRole> for InvitationRoleDb {
    fn from(role: InvitationRole) -> Self {
        match role {
            InvitationRole::Owner => InvitationRoleDb::Owner,
            InvitationRole::Member => InvitationRoleDb::Member,
        }
    }
}

/// Database enum for invitation_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(db_status: InvitationStatusDb) -> Self {
        match db_status {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Accepted => InvitationStatus::Accepted,
            InvitationStatusDb::Expired => InvitationStatus::Expired,
            InvitationStatusDb::Revoked => InvitationStatus::Revoked,
        }
    }
}

impl From<InvitationStatus> for InvitationStatusDb {
    fn from(status: InvitationStatus) -> Self {
        match status {
            InvitationStatus::Pending => InvitationStatusDb::Pending,
            InvitationStatus::Accepted => InvitationStatusDb::Accepted,
            InvitationStatus::Expired => InvitationStatusDb::Expired,
            InvitationStatus::Revoked => InvitationStatusDb::Revoked,
        }
    }
}

/// Database row mapping for the band_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub band_id: Uuid,
    pub invited_by: Uuid,
    pub token: String,
    pub email: Option<String>,
    pub role: InvitationRoleDb,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: InvitationStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<InvitationEntity> for Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            band_id: entity.band_id,
            invited_by: entity.invited_by,
            token: entity.token,
            email: entity.email,
            role: entity.role.into(),
            max_uses: entity.max_uses,
            current_uses: entity.current_uses,
            expires_at: entity.expires_at,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}

/// Invitation joined with its band (token lookup).
#[derive(Debug, Clone, FromRow)]
pub struct InvitationWithBandEntity {
    #[sqlx(flatten)]
    pub invitation: InvitationEntity,
    pub band_name: String,
    pub band_description: Option<String>,
}

impl From<InvitationWithBandEntity> for InvitationWithBand {
    fn from(entity: InvitationWithBandEntity) -> Self {
        let band = BandInfo {
            id: entity.invitation.band_id,
            name: entity.band_name,
            description: entity.band_description,
        };
        Self {
            invitation: entity.invitation.into(),
            band,
        }
    }
}

/// Invitation joined with its creator's profile (listing).
#[derive(Debug, Clone, FromRow)]
pub struct InvitationWithCreatorEntity {
    #[sqlx(flatten)]
    pub invitation: InvitationEntity,
    pub creator_id: Option<Uuid>,
    pub creator_name: Option<String>,
    pub creator_email: Option<String>,
}

impl From<InvitationWithCreatorEntity> for InvitationWithCreator {
    fn from(entity: InvitationWithCreatorEntity) -> Self {
        let creator = entity.creator_id.map(|id| CreatorInfo {
            id,
            name: entity.creator_name,
            email: entity.creator_email,
        });
        Self {
            invitation: entity.invitation.into(),
            creator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> InvitationEntity {
        InvitationEntity {
            id: Uuid::new_v4(),
            band_id: Uuid::new_v4(),
            invited_by: Uuid::new_v4(),
            token: Uuid::new_v4().to_string(),
            email: None,
            role: InvitationRoleDb::Owner,
            max_uses: None,
            current_uses: 3,
            expires_at: None,
            status: InvitationStatusDb::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_conversion() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Expired,
            InvitationStatus::Revoked,
        ] {
            let db: InvitationStatusDb = status.into();
            assert_eq!(InvitationStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_conversion() {
        let invitation: Invitation = entity().into();
        assert_eq!(invitation.role, InvitationRole::Owner);
        assert_eq!(invitation.current_uses, 3);
        assert!(invitation.max_uses.is_none());
    }

    #[test]
    fn test_missing_creator_profile() {
        let with_creator: InvitationWithCreator = InvitationWithCreatorEntity {
            invitation: entity(),
            creator_id: None,
            creator_name: None,
            creator_email: None,
        }
        .into();
        assert!(with_creator.creator.is_none());
    }

    #[test]
    fn test_band_join_conversion() {
        let inv = entity();
        let band_id = inv.band_id;
        let with_band: InvitationWithBand = InvitationWithBandEntity {
            invitation: inv,
            band_name: "Septet".to_string(),
            band_description: Some("Jazz".to_string()),
        }
        .into();
        assert_eq!(with_band.band.id, band_id);
        assert_eq!(with_band.band.description.as_deref(), Some("Jazz"));
    }
}
