//! Invitation service: creation, validation, acceptance, revocation and
//! listing of band invitations.
//!
//! Acceptance is the only multi-step write. It re-validates the token,
//! reconciles the user's membership, then records one use of the invitation.
//! The two writes are not transactional; if recording the use fails after
//! the membership was written, the use stays uncounted.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared::crypto::{generate_invite_token, token_fingerprint};
use shared::validation::{normalize_email, validate_expires_in_days, validate_max_uses};

use super::links::InviteLinks;
use super::reconcile::{reconcile, MembershipChange};
use super::token_lock::TokenLocks;
use crate::errors::DomainError;
use crate::models::{
    AcceptOutcome, CreateInvitationOptions, InvalidReason, Invitation, InvitationStatus,
    InvitationWithCreator, Membership, MembershipPatch, MembershipRole, MembershipStatus,
    NewInvitation, NewMembership, TokenValidation,
};
use crate::store::{InvitationStore, MembershipStore, ProfileStore};

/// Owns the invitation lifecycle.
pub struct InvitationService {
    invitations: Arc<dyn InvitationStore>,
    memberships: Arc<dyn MembershipStore>,
    profiles: Arc<dyn ProfileStore>,
    links: InviteLinks,
    locks: TokenLocks,
}

impl InvitationService {
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        memberships: Arc<dyn MembershipStore>,
        profiles: Arc<dyn ProfileStore>,
        links: InviteLinks,
    ) -> Self {
        Self {
            invitations,
            memberships,
            profiles,
            links,
            locks: TokenLocks::new(),
        }
    }

    /// Create an invitation for `band_id` on behalf of `invited_by`.
    pub async fn create_invitation(
        &self,
        band_id: Uuid,
        invited_by: Uuid,
        options: CreateInvitationOptions,
    ) -> Result<Invitation, DomainError> {
        if let Some(max_uses) = options.max_uses {
            validate_max_uses(max_uses)?;
        }
        if let Some(days) = options.expires_in_days {
            validate_expires_in_days(days)?;
        }
        let expires_at = options.expires_at(Utc::now())?;

        let token = generate_invite_token();
        let new = NewInvitation {
            band_id,
            invited_by,
            expires_at,
            email: options.email.as_deref().map(normalize_email),
            role: options.role,
            max_uses: options.max_uses,
            token,
        };

        let invitation = self.invitations.insert_invitation(new).await?;

        info!(
            band_id = %band_id,
            invitation_id = %invitation.id,
            invited_by = %invited_by,
            token = %token_fingerprint(&invitation.token),
            max_uses = ?invitation.max_uses,
            expires_at = ?invitation.expires_at,
            "Invitation created"
        );

        Ok(invitation)
    }

    /// Shareable link for a token.
    pub fn generate_invite_url(&self, token: &str) -> String {
        self.links.url_for(token)
    }

    /// Check whether `token` can currently be accepted.
    ///
    /// Checks run in a fixed order (usage cap, expiry, revocation) so the
    /// reported reason is deterministic. A pending invitation found past its
    /// expiry is written back as `expired`.
    pub async fn validate_invite_token(&self, token: &str) -> Result<TokenValidation, DomainError> {
        let Some(found) = self.invitations.find_invitation_by_token(token).await? else {
            debug!(token = %token_fingerprint(token), "Invitation token not found");
            return Ok(TokenValidation::Invalid(InvalidReason::InvalidToken));
        };

        match found.invitation.check(Utc::now()) {
            Ok(()) => Ok(TokenValidation::Valid(found)),
            Err(reason) => {
                if reason == InvalidReason::Expired
                    && found.invitation.status == InvitationStatus::Pending
                {
                    self.expire(&found.invitation).await;
                }
                debug!(
                    invitation_id = %found.invitation.id,
                    reason = reason.code(),
                    "Invitation token rejected"
                );
                Ok(TokenValidation::Invalid(reason))
            }
        }
    }

    /// Accept an invitation as `user_id`.
    ///
    /// `is_new_signup` marks a user who just created an account through the
    /// invitation link; they join immediately instead of getting a pending
    /// membership to confirm.
    pub async fn accept_invitation(
        &self,
        token: &str,
        user_id: Uuid,
        is_new_signup: bool,
    ) -> Result<AcceptOutcome, DomainError> {
        let _guard = self.locks.acquire(token).await;

        let invitation = match self.validate_invite_token(token).await? {
            TokenValidation::Valid(found) => found.invitation,
            TokenValidation::Invalid(reason) => {
                warn!(
                    user_id = %user_id,
                    token = %token_fingerprint(token),
                    reason = reason.code(),
                    "Invitation acceptance rejected"
                );
                return Err(DomainError::InvalidInvitation(reason));
            }
        };

        let existing = self
            .memberships
            .find_membership(invitation.band_id, user_id)
            .await?;
        let plan = reconcile(
            existing.as_ref(),
            invitation.role.membership_role(),
            is_new_signup,
        );
        self.apply_membership_change(plan.change, &invitation, user_id)
            .await?;

        // Repeat clicks by active members are counted too.
        let Some(updated) = self.invitations.record_invitation_use(invitation.id).await? else {
            warn!(
                invitation_id = %invitation.id,
                user_id = %user_id,
                "Invitation use cap reached concurrently"
            );
            return Err(DomainError::InvalidInvitation(InvalidReason::AlreadyUsed));
        };

        info!(
            band_id = %invitation.band_id,
            invitation_id = %invitation.id,
            user_id = %user_id,
            already_member = plan.already_member,
            is_pending = plan.is_pending,
            current_uses = updated.current_uses,
            status = %updated.status,
            "Invitation accepted"
        );

        Ok(AcceptOutcome {
            band_id: invitation.band_id,
            already_member: plan.already_member,
            is_pending: plan.is_pending,
        })
    }

    /// Revoke an invitation regardless of its current status.
    pub async fn revoke_invitation(&self, invitation_id: Uuid) -> Result<(), DomainError> {
        let updated = self
            .invitations
            .set_invitation_status(invitation_id, InvitationStatus::Revoked)
            .await?;

        if !updated {
            return Err(DomainError::NotFound("Invitation not found".to_string()));
        }

        info!(invitation_id = %invitation_id, "Invitation revoked");
        Ok(())
    }

    /// Look up an invitation by id.
    pub async fn get_invitation(&self, invitation_id: Uuid) -> Result<Invitation, DomainError> {
        self.invitations
            .find_invitation_by_id(invitation_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invitation not found".to_string()))
    }

    /// All invitations of a band, newest first.
    pub async fn get_band_invitations(
        &self,
        band_id: Uuid,
    ) -> Result<Vec<InvitationWithCreator>, DomainError> {
        Ok(self.invitations.list_band_invitations(band_id).await?)
    }

    /// Resolve an email to a user id. Advisory: lookup failures count as
    /// "no match".
    pub async fn check_user_exists(&self, email: &str) -> Option<Uuid> {
        let email = normalize_email(email);
        match self.profiles.find_profile_by_email(&email).await {
            Ok(profile) => profile.map(|p| p.id),
            Err(e) => {
                warn!(error = %e, "User lookup by email failed");
                None
            }
        }
    }

    /// Lazy expiry write-back. Best effort: a failure is logged and the
    /// next validation tries again.
    async fn expire(&self, invitation: &Invitation) {
        match self.invitations.mark_invitation_expired(invitation.id).await {
            Ok(true) => info!(invitation_id = %invitation.id, "Invitation expired"),
            Ok(false) => {}
            Err(e) => warn!(
                invitation_id = %invitation.id,
                error = %e,
                "Failed to record invitation expiry"
            ),
        }
    }

    async fn apply_membership_change(
        &self,
        change: MembershipChange,
        invitation: &Invitation,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let (membership_id, patch, role) = match change {
            MembershipChange::Keep => return Ok(()),
            MembershipChange::Insert { role, status } => {
                self.insert_membership(invitation, user_id, role, status)
                    .await?;
                return Ok(());
            }
            MembershipChange::Activate { membership_id } => (
                membership_id,
                MembershipPatch::status(MembershipStatus::Active),
                invitation.role.membership_role(),
            ),
            MembershipChange::Reactivate {
                membership_id,
                role,
            } => (
                membership_id,
                MembershipPatch {
                    status: Some(MembershipStatus::Active),
                    role: Some(role),
                },
                role,
            ),
        };

        if !self
            .memberships
            .update_membership(membership_id, patch)
            .await?
        {
            // Row was deleted (e.g. declined) between lookup and update.
            warn!(
                membership_id = %membership_id,
                user_id = %user_id,
                "Membership vanished during acceptance, inserting a new one"
            );
            self.insert_membership(invitation, user_id, role, MembershipStatus::Active)
                .await?;
        }
        Ok(())
    }

    async fn insert_membership(
        &self,
        invitation: &Invitation,
        user_id: Uuid,
        role: MembershipRole,
        status: MembershipStatus,
    ) -> Result<Membership, DomainError> {
        let membership = self
            .memberships
            .insert_membership(NewMembership {
                band_id: invitation.band_id,
                user_id,
                role,
                status,
                invited_by: Some(invitation.invited_by),
            })
            .await?;
        Ok(membership)
    }
}
