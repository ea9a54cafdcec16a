//! Session token signing and verification.
//!
//! Tokens use the format: `base64url(payload).base64url(signature)`
//!
//! The payload is a JSON object containing:
//! - `sub`: user id
//! - `email`: user email
//! - `subscription_type`: plan key snapshot at issue time
//! - `subscription_end`: subscription expiry (seconds since epoch)
//! - `device_id`: the device the session was opened from
//! - `iat` / `exp`: issued-at and expiry timestamps (seconds since epoch)
//!
//! The signature covers `payload_b64.as_bytes()` (the base64url-encoded
//! payload string, not the decoded JSON).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tollgate_types::UserId;

use crate::error::{CryptoError, CryptoResult};

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Token issuance configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Token lifetime in seconds from issue time.
    pub ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

/// The claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: UserId,
    /// User email.
    pub email: String,
    /// Plan key snapshot at issue time.
    pub subscription_type: String,
    /// Subscription expiry (seconds since epoch).
    pub subscription_end: i64,
    /// Device the session was opened from.
    pub device_id: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Token expiry timestamp (seconds since epoch).
    pub exp: i64,
}

/// The identity a token is issued for. Everything except the timestamps,
/// which the signer fills in at issue time.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub email: String,
    pub subscription_type: String,
    pub subscription_end: DateTime<Utc>,
    pub device_id: String,
}

/// Issues signed session tokens.
pub struct TokenSigner {
    signing_key: SigningKey,
    config: TokenConfig,
}

impl TokenSigner {
    /// Creates a signer from an existing key.
    #[must_use]
    pub fn new(signing_key: SigningKey, config: TokenConfig) -> Self {
        Self {
            signing_key,
            config,
        }
    }

    /// Creates a signer with a freshly generated random key.
    #[must_use]
    pub fn generate(config: TokenConfig) -> Self {
        Self::new(SigningKey::generate(&mut OsRng), config)
    }

    /// Creates a signer from 32 seed bytes. Used for deterministic keys in
    /// tests and for loading a configured key.
    #[must_use]
    pub fn from_seed(seed: [u8; 32], config: TokenConfig) -> Self {
        Self::new(SigningKey::from_bytes(&seed), config)
    }

    /// Returns the verifying key bytes for distribution to verifiers.
    #[must_use]
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Returns a verifier for tokens issued by this signer.
    #[must_use]
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Issues a token for the given identity, valid for the configured TTL
    /// starting now.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims fail to serialize.
    pub fn issue(&self, identity: &SessionIdentity) -> CryptoResult<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token with an explicit issue time. Exposed for tests that
    /// need to produce already-expired tokens.
    pub fn issue_at(
        &self,
        identity: &SessionIdentity,
        issued_at: DateTime<Utc>,
    ) -> CryptoResult<String> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: identity.user_id,
            email: identity.email.clone(),
            subscription_type: identity.subscription_type.clone(),
            subscription_end: identity.subscription_end.timestamp(),
            device_id: identity.device_id.clone(),
            iat,
            exp: iat + self.config.ttl_secs,
        };

        let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = self.signing_key.sign(payload_b64.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
        Ok(format!("{payload_b64}.{sig_b64}"))
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("signing_key", &"[REDACTED]")
            .field("config", &self.config)
            .finish()
    }
}

/// Verifies session tokens: signature first, then expiry.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    verifying_key: VerifyingKey,
}

impl TokenVerifier {
    /// Builds a verifier from 32 public key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid Ed25519 public key.
    pub fn from_bytes(pub_key_bytes: &[u8; 32]) -> CryptoResult<Self> {
        let verifying_key = VerifyingKey::from_bytes(pub_key_bytes)
            .map_err(|_| CryptoError::InvalidKey("invalid public key".to_string()))?;
        Ok(Self { verifying_key })
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, the signature does not
    /// verify, or the token has expired.
    pub fn verify(&self, token: &str) -> CryptoResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token against an explicit clock reading.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> CryptoResult<Claims> {
        let token = token.trim();

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            return Err(CryptoError::InvalidTokenFormat(
                "token must have exactly two parts separated by a dot".to_string(),
            ));
        }

        let payload_b64 = parts[0];
        let signature_b64 = parts[1];

        let sig_bytes = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| CryptoError::InvalidTokenFormat(format!("invalid signature base64: {e}")))?;

        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|_| CryptoError::InvalidTokenFormat("invalid signature length".to_string()))?;

        // Verify over the base64url-encoded payload bytes, matching issue()
        self.verifying_key
            .verify(payload_b64.as_bytes(), &signature)
            .map_err(|_| CryptoError::InvalidSignature)?;

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| CryptoError::InvalidTokenFormat(format!("invalid payload base64: {e}")))?;

        let claims: Claims = serde_json::from_slice(&payload_json)
            .map_err(|e| CryptoError::InvalidPayload(format!("invalid payload JSON: {e}")))?;

        if now.timestamp() >= claims.exp {
            return Err(CryptoError::TokenExpired(claims.exp));
        }

        Ok(claims)
    }
}
