//! Domain layer for the Bandly backend.
//!
//! This crate contains:
//! - Domain models (Band, Membership, Invitation, Profile)
//! - Store traits describing what the services need from persistence,
//!   plus an in-memory implementation
//! - Business logic services (invitations, memberships, bands)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
pub mod store;

pub use errors::{DomainError, StoreError};
