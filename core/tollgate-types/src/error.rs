//! The domain error taxonomy.
//!
//! Every operation in the account and subscription services fails with one
//! of these categories. Validation failures carry a human-readable message;
//! unexpected infrastructure failures are logged at the point of failure and
//! surfaced uniformly as [`Error::Internal`] so nothing internal leaks to
//! the caller.

use thiserror::Error;

/// Result type alias using the domain error taxonomy.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the account and subscription services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Missing or malformed input, including an invalid plan key.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Bad credentials or a missing/invalid session token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Blocked account status, expired subscription, device mismatch, or
    /// insufficient role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown user, plan, or subscription.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate unique field, duplicate active subscription, or a plan
    /// still referenced on delete.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unexpected store or infrastructure failure. Details are logged where
    /// the failure occurred, never carried in the error itself.
    #[error("internal error")]
    Internal,
}

impl Error {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Check if this error indicates a resource was not found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error indicates a uniqueness or state conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
