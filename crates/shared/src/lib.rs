//! Shared utilities and common types for the Bandly backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Invitation token generation and fingerprinting
//! - Validation of identity-provider access tokens (HS256 JWT)
//! - Email normalization and validation

pub mod crypto;
pub mod jwt;
pub mod validation;
