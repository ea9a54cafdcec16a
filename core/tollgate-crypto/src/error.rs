//! Error types for the crypto layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur hashing passwords or handling session tokens.
///
/// The service layer maps these into the domain taxonomy: password
/// verification failures become `Unauthorized`, token failures become
/// `Unauthorized`, and everything else is logged and surfaced as
/// `Internal`.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Password hashing or hash parsing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Password does not match the stored hash.
    #[error("invalid password")]
    InvalidPassword,

    /// Token is not two base64url parts separated by a dot.
    #[error("invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// Ed25519 signature verification failed.
    #[error("token signature invalid")]
    InvalidSignature,

    /// Payload JSON is malformed or missing required fields.
    #[error("invalid token payload: {0}")]
    InvalidPayload(String),

    /// Token expiry timestamp has passed.
    #[error("token expired at {0}")]
    TokenExpired(i64),

    /// Signing or verifying key bytes are not a valid Ed25519 key.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
