//! Membership service: direct email invitations and the invitee's inbox of
//! pending memberships.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use shared::validation::{normalize_email, validate_email_format};

use crate::errors::DomainError;
use crate::models::{
    Membership, MembershipPatch, MembershipRole, MembershipStatus, NewMembership,
    PendingMembership,
};
use crate::store::{MembershipStore, ProfileStore};

pub struct MembershipService {
    memberships: Arc<dyn MembershipStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl MembershipService {
    pub fn new(memberships: Arc<dyn MembershipStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            memberships,
            profiles,
        }
    }

    /// Invite a registered user by email. Creates a pending membership the
    /// user confirms or declines from their inbox.
    pub async fn invite_member_by_email(
        &self,
        band_id: Uuid,
        email: &str,
        invited_by: Uuid,
    ) -> Result<Membership, DomainError> {
        validate_email_format(email)?;
        let email = normalize_email(email);

        let profile = self
            .profiles
            .find_profile_by_email(&email)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(
                    "No user found with that email. They need to sign up first.".to_string(),
                )
            })?;

        if let Some(existing) = self.memberships.find_membership(band_id, profile.id).await? {
            return Err(if existing.is_active() {
                DomainError::Conflict("User is already a member of this band".to_string())
            } else {
                DomainError::Conflict("User already has a pending invitation".to_string())
            });
        }

        let membership = self
            .memberships
            .insert_membership(NewMembership {
                band_id,
                user_id: profile.id,
                role: MembershipRole::Member,
                status: MembershipStatus::Pending,
                invited_by: Some(invited_by),
            })
            .await?;

        info!(
            band_id = %band_id,
            user_id = %profile.id,
            invited_by = %invited_by,
            membership_id = %membership.id,
            "Member invited by email"
        );

        Ok(membership)
    }

    pub async fn list_pending_memberships(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingMembership>, DomainError> {
        Ok(self.memberships.list_pending_memberships(user_id).await?)
    }

    /// Confirm a pending membership owned by `user_id`.
    pub async fn confirm_membership(
        &self,
        membership_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let membership = self.pending_for_user(membership_id, user_id).await?;

        let updated = self
            .memberships
            .update_membership(
                membership.id,
                MembershipPatch::status(MembershipStatus::Active),
            )
            .await?;
        if !updated {
            return Err(membership_not_found());
        }

        info!(
            band_id = %membership.band_id,
            user_id = %user_id,
            membership_id = %membership_id,
            "Membership confirmed"
        );
        Ok(())
    }

    /// Decline a pending membership owned by `user_id`. The row is removed.
    pub async fn decline_membership(
        &self,
        membership_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let membership = self.pending_for_user(membership_id, user_id).await?;

        if !self.memberships.delete_membership(membership.id).await? {
            return Err(membership_not_found());
        }

        info!(
            band_id = %membership.band_id,
            user_id = %user_id,
            membership_id = %membership_id,
            "Membership declined"
        );
        Ok(())
    }

    async fn pending_for_user(
        &self,
        membership_id: Uuid,
        user_id: Uuid,
    ) -> Result<Membership, DomainError> {
        let membership = self
            .memberships
            .find_membership_by_id(membership_id)
            .await?
            .filter(|m| m.user_id == user_id)
            .ok_or_else(membership_not_found)?;

        if membership.status != MembershipStatus::Pending {
            return Err(DomainError::Conflict(
                "Membership is not pending".to_string(),
            ));
        }
        Ok(membership)
    }
}

fn membership_not_found() -> DomainError {
    DomainError::NotFound("Membership not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, NewBand, Profile};
    use crate::store::{BandStore, InMemoryStore};
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: MembershipService,
        band: Band,
        admin: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let admin = Uuid::new_v4();
        let band = store
            .insert_band(NewBand {
                name: "Quartet".to_string(),
                description: None,
                photo_url: None,
                created_by: admin,
            })
            .await
            .unwrap();
        let service = MembershipService::new(store.clone(), store.clone());
        Fixture {
            store,
            service,
            band,
            admin,
        }
    }

    async fn register(store: &InMemoryStore) -> Profile {
        let email: String = SafeEmail().fake();
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            name: Some(Name().fake()),
            avatar_url: None,
        };
        store.add_profile(profile.clone()).await;
        profile
    }

    #[tokio::test]
    async fn test_invite_by_email_creates_pending_member() {
        let f = fixture().await;
        let profile = register(&f.store).await;

        let membership = f
            .service
            .invite_member_by_email(
                f.band.id,
                &format!("  {}  ", profile.email.to_uppercase()),
                f.admin,
            )
            .await
            .unwrap();

        assert_eq!(membership.user_id, profile.id);
        assert_eq!(membership.status, MembershipStatus::Pending);
        assert_eq!(membership.role, MembershipRole::Member);
        assert_eq!(membership.invited_by, Some(f.admin));
    }

    #[tokio::test]
    async fn test_invite_by_email_errors() {
        let f = fixture().await;

        let bad = f
            .service
            .invite_member_by_email(f.band.id, "not-an-email", f.admin)
            .await;
        assert!(matches!(bad, Err(DomainError::Validation(_))));

        let unknown = f
            .service
            .invite_member_by_email(f.band.id, "nobody@example.com", f.admin)
            .await;
        assert!(matches!(unknown, Err(DomainError::NotFound(_))));

        let profile = register(&f.store).await;
        f.service
            .invite_member_by_email(f.band.id, &profile.email, f.admin)
            .await
            .unwrap();
        let again = f
            .service
            .invite_member_by_email(f.band.id, &profile.email, f.admin)
            .await;
        assert!(
            matches!(again, Err(DomainError::Conflict(ref m)) if m.contains("pending invitation"))
        );
    }

    #[tokio::test]
    async fn test_invite_active_member_conflicts() {
        let f = fixture().await;
        let profile = register(&f.store).await;
        f.store
            .insert_membership(NewMembership {
                band_id: f.band.id,
                user_id: profile.id,
                role: MembershipRole::Member,
                status: MembershipStatus::Active,
                invited_by: None,
            })
            .await
            .unwrap();

        let result = f
            .service
            .invite_member_by_email(f.band.id, &profile.email, f.admin)
            .await;
        assert!(
            matches!(result, Err(DomainError::Conflict(ref m)) if m.contains("already a member"))
        );
    }

    #[tokio::test]
    async fn test_confirm_pending_membership() {
        let f = fixture().await;
        let profile = register(&f.store).await;
        let membership = f
            .service
            .invite_member_by_email(f.band.id, &profile.email, f.admin)
            .await
            .unwrap();

        let pending = f.service.list_pending_memberships(profile.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].band.name, "Quartet");

        f.service
            .confirm_membership(membership.id, profile.id)
            .await
            .unwrap();
        let stored = f
            .store
            .find_membership_by_id(membership.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MembershipStatus::Active);
        assert!(f
            .service
            .list_pending_memberships(profile.id)
            .await
            .unwrap()
            .is_empty());

        let twice = f.service.confirm_membership(membership.id, profile.id).await;
        assert!(matches!(twice, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_decline_removes_row() {
        let f = fixture().await;
        let profile = register(&f.store).await;
        let membership = f
            .service
            .invite_member_by_email(f.band.id, &profile.email, f.admin)
            .await
            .unwrap();

        f.service
            .decline_membership(membership.id, profile.id)
            .await
            .unwrap();
        assert!(f
            .store
            .find_membership_by_id(membership.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_foreign_membership_is_not_found() {
        let f = fixture().await;
        let profile = register(&f.store).await;
        let membership = f
            .service
            .invite_member_by_email(f.band.id, &profile.email, f.admin)
            .await
            .unwrap();

        let stranger = Uuid::new_v4();
        let confirm = f.service.confirm_membership(membership.id, stranger).await;
        assert!(matches!(confirm, Err(DomainError::NotFound(_))));
        let decline = f.service.decline_membership(membership.id, stranger).await;
        assert!(matches!(decline, Err(DomainError::NotFound(_))));
        let missing = f
            .service
            .confirm_membership(Uuid::new_v4(), profile.id)
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }
}
