//! Repository implementations of the domain store traits.

pub mod band;
pub mod event;
pub mod invitation;
pub mod membership;
pub mod profile;

pub use band::BandRepository;
pub use event::EventRepository;
pub use invitation::InvitationRepository;
pub use membership::MembershipRepository;
pub use profile::ProfileRepository;
