//! Argon2id password hashing.
//!
//! Hashes are produced in PHC string format, which embeds the algorithm,
//! version, cost parameters, and salt. Verification therefore needs no
//! side-channel parameter storage and keeps working after a cost bump.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{CryptoError, CryptoResult};

/// Argon2id cost parameters.
///
/// Default values follow the OWASP recommendations for Argon2id, keeping
/// derivation under a second on modern hardware.
#[derive(Debug, Clone)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashParams {
    /// Reduced-cost parameters for tests. Fast but insecure.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            memory_cost: 1024, // 1 MiB
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn build(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| CryptoError::Hash(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns an error if the cost parameters are invalid or hashing fails.
pub fn hash_password(password: &str, params: &HashParams) -> CryptoResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .build()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CryptoError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPassword`] when the password does not
/// match, and [`CryptoError::Hash`] when the stored hash is unparseable.
pub fn verify_password(password: &str, stored_hash: &str) -> CryptoResult<()> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| CryptoError::Hash(e.to_string()))?;
    // Cost parameters come from the PHC string, so the default context is
    // correct for hashes produced with any HashParams.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CryptoError::InvalidPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct horse battery", &HashParams::fast()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        verify_password("correct horse battery", &hash).unwrap();
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("hunter2hunter2", &HashParams::fast()).unwrap();
        let err = verify_password("hunter3hunter3", &hash).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPassword));
    }

    #[test]
    fn hashes_are_salted() {
        let params = HashParams::fast();
        let a = hash_password("same password", &params).unwrap();
        let b = hash_password("same password", &params).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        let err = verify_password("whatever1", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, CryptoError::Hash(_)));
    }
}
