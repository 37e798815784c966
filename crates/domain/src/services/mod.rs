//! Domain services for Bandly.
//!
//! Services contain business logic that operates on domain models through
//! the store traits.

pub mod band;
pub mod event;
pub mod invitation;
pub mod links;
pub mod membership;
pub mod reconcile;
pub mod token_lock;

pub use band::BandService;
pub use event::EventService;
pub use invitation::InvitationService;
pub use links::InviteLinks;
pub use membership::MembershipService;
pub use reconcile::{reconcile, MembershipChange, Reconciliation};
pub use token_lock::{TokenGuard, TokenLocks};
