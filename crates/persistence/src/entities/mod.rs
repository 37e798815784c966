//! Database entity definitions.

pub mod band;
pub mod event;
pub mod invitation;
pub mod membership;
pub mod profile;

pub use band::{BandEntity, BandWithRoleEntity};
pub use event::{EventEntity, EventTypeDb};
pub use invitation::{
    InvitationEntity, InvitationRoleDb, InvitationStatusDb, InvitationWithBandEntity,
    InvitationWithCreatorEntity,
};
pub use membership::{
    MembershipEntity, MembershipRoleDb, MembershipStatusDb, PendingMembershipEntity,
};
pub use profile::ProfileEntity;
