//! In-memory store.
//!
//! Implements every store trait over plain collections guarded by one async
//! lock. Used by the service and HTTP tests and for running the API without
//! a database. Individual operations can be made to fail to exercise error
//! paths.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{BandStore, EventStore, InvitationStore, MembershipStore, ProfileStore};
use crate::errors::StoreError;
use crate::models::{
    Band, BandSummary, CreatorInfo, Event, EventPatch, Invitation, InvitationStatus,
    InvitationWithBand, InvitationWithCreator, Membership, MembershipPatch, MembershipStatus,
    NewBand, NewEvent, NewInvitation, NewMembership, PendingMembership, Profile,
};

#[derive(Debug, Default)]
struct Tables {
    bands: Vec<Band>,
    members: Vec<Membership>,
    invitations: Vec<Invitation>,
    profiles: Vec<Profile>,
    events: Vec<Event>,
}

impl Tables {
    fn band(&self, id: Uuid) -> Option<&Band> {
        self.bands.iter().find(|b| b.id == id)
    }
}

/// Store backed by in-process collections.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    failing: Mutex<HashSet<&'static str>>,
    exhaust_before_use: Mutex<HashSet<Uuid>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile row.
    pub async fn add_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.push(profile);
    }

    /// Make every later call of the named operation fail with a backend error.
    pub async fn fail_operation(&self, operation: &'static str) {
        self.failing.lock().await.insert(operation);
    }

    pub async fn clear_failures(&self) {
        self.failing.lock().await.clear();
    }

    /// All membership rows of a band, in insertion order.
    pub async fn band_memberships(&self, band_id: Uuid) -> Vec<Membership> {
        self.tables
            .read()
            .await
            .members
            .iter()
            .filter(|m| m.band_id == band_id)
            .cloned()
            .collect()
    }

    /// All invitations of a band, in insertion order.
    pub async fn band_invitations(&self, band_id: Uuid) -> Vec<Invitation> {
        self.tables
            .read()
            .await
            .invitations
            .iter()
            .filter(|i| i.band_id == band_id)
            .cloned()
            .collect()
    }

    /// Use up the remaining capacity of a capped invitation right before the
    /// next `record_invitation_use` call for it, as another process
    /// accepting the same link would.
    pub async fn exhaust_before_next_use(&self, invitation_id: Uuid) {
        self.exhaust_before_use.lock().await.insert(invitation_id);
    }

    async fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.failing.lock().await.contains(operation) {
            return Err(StoreError::Backend(format!("{} failed", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl InvitationStore for InMemoryStore {
    async fn insert_invitation(&self, new: NewInvitation) -> Result<Invitation, StoreError> {
        self.check("insert_invitation").await?;
        let mut tables = self.tables.write().await;

        if tables.invitations.iter().any(|i| i.token == new.token) {
            return Err(StoreError::Conflict("invitation token already exists".into()));
        }

        let invitation = Invitation {
            id: Uuid::new_v4(),
            band_id: new.band_id,
            invited_by: new.invited_by,
            token: new.token,
            email: new.email,
            role: new.role,
            max_uses: new.max_uses,
            current_uses: 0,
            expires_at: new.expires_at,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
        };
        tables.invitations.push(invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InvitationWithBand>, StoreError> {
        self.check("find_invitation_by_token").await?;
        let tables = self.tables.read().await;

        let found = tables
            .invitations
            .iter()
            .find(|i| i.token == token)
            .and_then(|i| {
                tables.band(i.band_id).map(|band| InvitationWithBand {
                    invitation: i.clone(),
                    band: band.info(),
                })
            });
        Ok(found)
    }

    async fn find_invitation_by_id(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        self.check("find_invitation_by_id").await?;
        let tables = self.tables.read().await;
        Ok(tables.invitations.iter().find(|i| i.id == id).cloned())
    }

    async fn mark_invitation_expired(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check("mark_invitation_expired").await?;
        let mut tables = self.tables.write().await;

        match tables
            .invitations
            .iter_mut()
            .find(|i| i.id == id && i.status == InvitationStatus::Pending)
        {
            Some(invitation) => {
                invitation.status = InvitationStatus::Expired;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_invitation_use(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        self.check("record_invitation_use").await?;
        let exhaust = self.exhaust_before_use.lock().await.remove(&id);
        let mut tables = self.tables.write().await;

        if exhaust {
            if let Some(invitation) = tables.invitations.iter_mut().find(|i| i.id == id) {
                if let Some(max_uses) = invitation.max_uses {
                    invitation.status = invitation.status_after_uses(max_uses);
                    invitation.current_uses = max_uses;
                }
            }
        }

        let Some(invitation) = tables
            .invitations
            .iter_mut()
            .find(|i| i.id == id && !i.is_exhausted())
        else {
            return Ok(None);
        };

        let uses = invitation.current_uses + 1;
        invitation.status = invitation.status_after_uses(uses);
        invitation.current_uses = uses;
        Ok(Some(invitation.clone()))
    }

    async fn set_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
    ) -> Result<bool, StoreError> {
        self.check("set_invitation_status").await?;
        let mut tables = self.tables.write().await;

        match tables.invitations.iter_mut().find(|i| i.id == id) {
            Some(invitation) => {
                invitation.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_band_invitations(
        &self,
        band_id: Uuid,
    ) -> Result<Vec<InvitationWithCreator>, StoreError> {
        self.check("list_band_invitations").await?;
        let tables = self.tables.read().await;

        // Rows are appended in creation order, so reverse iteration is newest first.
        let invitations = tables
            .invitations
            .iter()
            .rev()
            .filter(|i| i.band_id == band_id)
            .map(|i| InvitationWithCreator {
                invitation: i.clone(),
                creator: tables
                    .profiles
                    .iter()
                    .find(|p| p.id == i.invited_by)
                    .map(CreatorInfo::from),
            })
            .collect();
        Ok(invitations)
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn find_membership(
        &self,
        band_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        self.check("find_membership").await?;
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .find(|m| m.band_id == band_id && m.user_id == user_id)
            .cloned())
    }

    async fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>, StoreError> {
        self.check("find_membership_by_id").await?;
        let tables = self.tables.read().await;
        Ok(tables.members.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_membership(&self, new: NewMembership) -> Result<Membership, StoreError> {
        self.check("insert_membership").await?;
        let mut tables = self.tables.write().await;

        if tables
            .members
            .iter()
            .any(|m| m.band_id == new.band_id && m.user_id == new.user_id)
        {
            return Err(StoreError::Conflict("membership already exists".into()));
        }

        let membership = Membership {
            id: Uuid::new_v4(),
            band_id: new.band_id,
            user_id: new.user_id,
            role: new.role,
            status: new.status,
            invited_by: new.invited_by,
            joined_at: Utc::now(),
        };
        tables.members.push(membership.clone());
        Ok(membership)
    }

    async fn update_membership(
        &self,
        id: Uuid,
        patch: MembershipPatch,
    ) -> Result<bool, StoreError> {
        self.check("update_membership").await?;
        let mut tables = self.tables.write().await;

        match tables.members.iter_mut().find(|m| m.id == id) {
            Some(membership) => {
                if let Some(status) = patch.status {
                    membership.status = status;
                }
                if let Some(role) = patch.role {
                    membership.role = role;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check("delete_membership").await?;
        let mut tables = self.tables.write().await;

        let before = tables.members.len();
        tables.members.retain(|m| m.id != id);
        Ok(tables.members.len() < before)
    }

    async fn list_pending_memberships(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingMembership>, StoreError> {
        self.check("list_pending_memberships").await?;
        let tables = self.tables.read().await;

        let pending = tables
            .members
            .iter()
            .filter(|m| m.user_id == user_id && m.status == MembershipStatus::Pending)
            .filter_map(|m| {
                tables.band(m.band_id).map(|band| PendingMembership {
                    membership: m.clone(),
                    band: band.info(),
                })
            })
            .collect();
        Ok(pending)
    }
}

#[async_trait]
impl BandStore for InMemoryStore {
    async fn insert_band(&self, new: NewBand) -> Result<Band, StoreError> {
        self.check("insert_band").await?;
        let now = Utc::now();
        let band = Band {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            photo_url: new.photo_url,
            created_by: Some(new.created_by),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.bands.push(band.clone());
        Ok(band)
    }

    async fn find_band(&self, id: Uuid) -> Result<Option<Band>, StoreError> {
        self.check("find_band").await?;
        Ok(self.tables.read().await.band(id).cloned())
    }

    async fn list_user_bands(&self, user_id: Uuid) -> Result<Vec<BandSummary>, StoreError> {
        self.check("list_user_bands").await?;
        let tables = self.tables.read().await;

        let bands = tables
            .bands
            .iter()
            .rev()
            .filter_map(|band| {
                tables
                    .members
                    .iter()
                    .find(|m| m.band_id == band.id && m.user_id == user_id && m.is_active())
                    .map(|m| BandSummary {
                        band: band.clone(),
                        your_role: m.role,
                    })
            })
            .collect();
        Ok(bands)
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        self.check("find_profile_by_email").await?;
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.email == email).cloned())
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn insert_event(&self, new: NewEvent) -> Result<Event, StoreError> {
        self.check("insert_event").await?;
        let mut tables = self.tables.write().await;

        if tables.band(new.band_id).is_none() {
            return Err(StoreError::Conflict("band does not exist".into()));
        }

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            band_id: new.band_id,
            name: new.name,
            description: new.description,
            event_date: new.event_date,
            event_time: new.event_time,
            location: new.location,
            event_type: new.event_type,
            created_by: Some(new.created_by),
            created_at: now,
            updated_at: now,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        self.check("find_event").await?;
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_upcoming_events(
        &self,
        band_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, StoreError> {
        self.check("list_upcoming_events").await?;
        let tables = self.tables.read().await;

        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| e.band_id == band_id && e.event_date >= from)
            .cloned()
            .collect();
        events.sort_by_key(Event::schedule_key);
        events.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(events)
    }

    async fn update_event(
        &self,
        id: Uuid,
        patch: EventPatch,
    ) -> Result<Option<Event>, StoreError> {
        self.check("update_event").await?;
        let mut tables = self.tables.write().await;

        let Some(event) = tables.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            event.name = name;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(event_date) = patch.event_date {
            event.event_date = event_date;
        }
        if let Some(event_time) = patch.event_time {
            event.event_time = event_time;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check("delete_event").await?;
        let mut tables = self.tables.write().await;

        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        Ok(tables.events.len() < before)
    }
}
