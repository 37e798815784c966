//! Band service: creation, listing and the admin check guarding invitation
//! management.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{
    Band, BandSummary, Membership, MembershipRole, MembershipStatus, NewBand, NewMembership,
};
use crate::store::{BandStore, MembershipStore};

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

pub struct BandService {
    bands: Arc<dyn BandStore>,
    memberships: Arc<dyn MembershipStore>,
}

impl BandService {
    pub fn new(bands: Arc<dyn BandStore>, memberships: Arc<dyn MembershipStore>) -> Self {
        Self { bands, memberships }
    }

    /// Create a band. The creator becomes its first active admin.
    pub async fn create_band(
        &self,
        name: &str,
        description: Option<String>,
        photo_url: Option<String>,
        created_by: Uuid,
    ) -> Result<Band, DomainError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(
                "Name must be between 1 and 100 characters".to_string(),
            ));
        }
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(DomainError::Validation(
                "Description must be at most 500 characters".to_string(),
            ));
        }

        let band = self
            .bands
            .insert_band(NewBand {
                name: name.to_string(),
                description,
                photo_url,
                created_by,
            })
            .await?;

        self.memberships
            .insert_membership(NewMembership {
                band_id: band.id,
                user_id: created_by,
                role: MembershipRole::Admin,
                status: MembershipStatus::Active,
                invited_by: None,
            })
            .await?;

        info!(band_id = %band.id, created_by = %created_by, "Band created");
        Ok(band)
    }

    pub async fn list_user_bands(&self, user_id: Uuid) -> Result<Vec<BandSummary>, DomainError> {
        Ok(self.bands.list_user_bands(user_id).await?)
    }

    /// Ensure `user_id` is an active admin of `band_id`.
    pub async fn require_band_admin(
        &self,
        band_id: Uuid,
        user_id: Uuid,
    ) -> Result<Membership, DomainError> {
        let membership = self
            .memberships
            .find_membership(band_id, user_id)
            .await?
            .filter(Membership::is_active)
            .ok_or_else(|| DomainError::NotFound("Band not found".to_string()))?;

        if !membership.role.can_manage_invitations() {
            return Err(DomainError::Forbidden(
                "Only band admins can manage invitations".to_string(),
            ));
        }
        Ok(membership)
    }
}
