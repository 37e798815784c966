//! Domain error types.

use thiserror::Error;

use crate::models::invitation::InvalidReason;

/// Failure reported by a store implementation.
///
/// Store errors are propagated to the caller unchanged and never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness or foreign-key constraint rejected the write.
    #[error("Store conflict: {0}")]
    Conflict(String),

    /// Any other failure of the underlying store (connectivity, protocol, ...).
    #[error("Store error: {0}")]
    Backend(String),
}

/// Errors returned by the domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The token resolved, but the invitation fails a business rule.
    #[error("Invalid invitation: {0}")]
    InvalidInvitation(InvalidReason),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<validator::ValidationError> for DomainError {
    fn from(err: validator::ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        DomainError::Validation(message)
    }
}
