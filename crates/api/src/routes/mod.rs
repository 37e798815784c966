//! HTTP route handlers.

pub mod bands;
pub mod events;
pub mod health;
pub mod invitations;
pub mod memberships;
pub mod profiles;
