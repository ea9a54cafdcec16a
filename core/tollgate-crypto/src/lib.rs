//! Password hashing and session-token signing for Tollgate.
//!
//! This crate handles:
//! - Argon2id password hashing in PHC string format with tunable cost
//! - Ed25519-signed session tokens in the format
//!   `base64url(payload).base64url(signature)`
//!
//! # Design Principles
//!
//! - **One-way only**: plaintext passwords exist transiently in memory and
//!   are never returned from any function in this crate
//! - **Self-contained tokens**: verification needs only the verifying key,
//!   no store lookup or shared session state
//! - **Pure operations**: no I/O, no clocks beyond reading the current time
//!   for issue/expiry checks
//!
//! # Token Format
//!
//! The payload is a JSON object signed with Ed25519, containing the user
//! id, email, subscription snapshot, device id, and issued-at/expiry
//! timestamps. The signature covers the base64url-encoded payload string,
//! not the decoded JSON.

mod error;
pub mod password;
pub mod token;

pub use error::{CryptoError, CryptoResult};
pub use password::{hash_password, verify_password, HashParams};
pub use token::{
    Claims, SessionIdentity, TokenConfig, TokenSigner, TokenVerifier, DEFAULT_TOKEN_TTL_SECS,
};
