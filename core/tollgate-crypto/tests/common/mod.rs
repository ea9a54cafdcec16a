//! Shared test helpers for token tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use tollgate_crypto::{SessionIdentity, TokenConfig, TokenSigner};
use tollgate_types::UserId;

/// Returns a signer with a deterministic Ed25519 key from a fixed seed.
pub fn test_signer(config: TokenConfig) -> TokenSigner {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    TokenSigner::from_seed(seed, config)
}

/// An identity with a subscription window open for another 30 days.
pub fn test_identity() -> SessionIdentity {
    SessionIdentity {
        user_id: UserId::new(),
        email: "test@example.com".to_string(),
        subscription_type: "1_month".to_string(),
        subscription_end: Utc::now() + Duration::days(30),
        device_id: "device-alpha".to_string(),
    }
}
