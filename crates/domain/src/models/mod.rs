//! Domain models for Bandly.

pub mod band;
pub mod event;
pub mod invitation;
pub mod membership;
pub mod profile;

pub use band::{Band, BandInfo, BandSummary, NewBand};
pub use event::{
    CreateEventRequest, Event, EventPatch, EventType, ListEventsResponse, NewEvent,
    UpdateEventRequest,
};
pub use invitation::{
    AcceptInvitationRequest, AcceptOutcome, CreateInvitationOptions, CreateInvitationRequest,
    CreateInvitationResponse, InvalidReason, Invitation, InvitationRole, InvitationStatus,
    InvitationWithBand, InvitationWithCreator, ListInvitationsResponse, NewInvitation,
    TokenValidation, ValidateInvitationResponse,
};
pub use membership::{
    Membership, MembershipPatch, MembershipRole, MembershipStatus, NewMembership,
    PendingMembership,
};
pub use profile::{CreatorInfo, Profile};
