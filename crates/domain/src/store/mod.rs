//! Store traits consumed by the domain services.
//!
//! Each trait covers one table. Single-row lookups return `Option`, scans
//! return `Vec`; no call mixes the two. Implementations: the PostgreSQL
//! repositories in the `persistence` crate and [`memory::InMemoryStore`].

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    Band, BandSummary, Event, EventPatch, Invitation, InvitationStatus, InvitationWithBand,
    InvitationWithCreator, Membership, MembershipPatch, NewBand, NewEvent, NewInvitation,
    NewMembership, PendingMembership, Profile,
};

pub use memory::InMemoryStore;

/// Operations on the `band_invitations` table.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Insert a new invitation with zero uses and `pending` status.
    async fn insert_invitation(&self, new: NewInvitation) -> Result<Invitation, StoreError>;

    /// Exact token match, joined with the owning band.
    async fn find_invitation_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InvitationWithBand>, StoreError>;

    async fn find_invitation_by_id(&self, id: Uuid) -> Result<Option<Invitation>, StoreError>;

    /// Flip a `pending` invitation to `expired`. Returns false when the row
    /// was missing or no longer pending.
    async fn mark_invitation_expired(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Atomically record one use: increments `current_uses` only while it is
    /// below `max_uses` (or uncapped), moving a pending invitation to
    /// `accepted` when the cap is reached. `None` means nothing was updated.
    async fn record_invitation_use(&self, id: Uuid) -> Result<Option<Invitation>, StoreError>;

    /// Unconditionally set the status. Returns false when the row is missing.
    async fn set_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
    ) -> Result<bool, StoreError>;

    /// All invitations of a band with creator profile, newest first.
    async fn list_band_invitations(
        &self,
        band_id: Uuid,
    ) -> Result<Vec<InvitationWithCreator>, StoreError>;
}

/// Operations on the `band_members` table.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find_membership(
        &self,
        band_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;

    async fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>, StoreError>;

    async fn insert_membership(&self, new: NewMembership) -> Result<Membership, StoreError>;

    /// Apply a partial update. Returns false when the row is missing.
    async fn update_membership(&self, id: Uuid, patch: MembershipPatch)
        -> Result<bool, StoreError>;

    /// Hard-delete a row. Returns false when the row is missing.
    async fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Pending memberships of a user joined with band display fields.
    async fn list_pending_memberships(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingMembership>, StoreError>;
}

/// Operations on the `bands` table.
#[async_trait]
pub trait BandStore: Send + Sync {
    async fn insert_band(&self, new: NewBand) -> Result<Band, StoreError>;

    async fn find_band(&self, id: Uuid) -> Result<Option<Band>, StoreError>;

    /// Bands where the user holds an active membership, newest first.
    async fn list_user_bands(&self, user_id: Uuid) -> Result<Vec<BandSummary>, StoreError>;
}

/// Operations on the `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Lookup by an already-normalized email.
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;
}

/// Operations on the `events` table.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert_event(&self, new: NewEvent) -> Result<Event, StoreError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// Events of a band dated `from` or later, soonest first, at most `limit`.
    async fn list_upcoming_events(
        &self,
        band_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, StoreError>;

    /// Apply a partial update and touch `updated_at`. `None` when the row is
    /// missing.
    async fn update_event(&self, id: Uuid, patch: EventPatch)
        -> Result<Option<Event>, StoreError>;

    /// Hard-delete a row. Returns false when the row is missing.
    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError>;
}
