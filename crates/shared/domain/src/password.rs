//! Credential hashing.
//!
//! `CredentialHasher` guards the input length and delegates to a
//! `HashPrimitive`; `Argon2Primitive` is the production primitive.

use std::sync::Arc;

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::constants::MAX_CREDENTIAL_BYTES;
use crate::error::{DomainError, DomainResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// One-way, salted hashing primitive.
///
/// Encoded output must be self-describing: salt and cost parameters travel
/// with the hash so verification needs nothing else.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait HashPrimitive: Send + Sync {
    /// Derive an encoded hash from raw secret bytes
    fn derive(&self, secret: &[u8]) -> DomainResult<String>;

    /// Check raw secret bytes against an encoded hash
    fn verify(&self, secret: &[u8], encoded: &str) -> bool;
}

/// Argon2id primitive producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2Primitive {
    params: Params,
}

impl Argon2Primitive {
    /// Build the primitive with the given work factor.
    ///
    /// # Errors
    /// Returns `HashingFailed` if the parameters are out of Argon2's range.
    pub fn new(params: HashingParams) -> DomainResult<Self> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| DomainError::hashing_failed(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl HashPrimitive for Argon2Primitive {
    fn derive(&self, secret: &[u8]) -> DomainResult<String> {
        let mut salt = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| DomainError::hashing_failed(format!("Salt generation failed: {}", e)))?;
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| DomainError::hashing_failed(format!("Salt encoding failed: {}", e)))?;

        let hash = self
            .argon2()
            .hash_password(secret, &salt)
            .map_err(|e| DomainError::hashing_failed(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &[u8], encoded: &str) -> bool {
        // Cost parameters come from the encoded hash, not from self.
        match PasswordHash::new(encoded) {
            Ok(parsed) => Argon2::default().verify_password(secret, &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

/// Hashed password value object.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

/// Length-guarded credential hasher.
#[derive(Clone)]
pub struct CredentialHasher {
    primitive: Arc<dyn HashPrimitive>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl CredentialHasher {
    pub fn new(primitive: Arc<dyn HashPrimitive>) -> Self {
        Self { primitive }
    }

    /// Argon2id-backed hasher with the given work factor.
    pub fn argon2(params: HashingParams) -> DomainResult<Self> {
        Ok(Self::new(Arc::new(Argon2Primitive::new(params)?)))
    }

    /// Hash a plaintext password.
    ///
    /// # Errors
    /// - `CredentialTooLong` if the plaintext exceeds `MAX_CREDENTIAL_BYTES`;
    ///   the primitive is not invoked.
    /// - `HashingFailed` if the primitive fails.
    pub fn hash(&self, plaintext: &str) -> DomainResult<Password> {
        if plaintext.len() > MAX_CREDENTIAL_BYTES {
            return Err(DomainError::CredentialTooLong);
        }

        let hash = self.primitive.derive(plaintext.as_bytes())?;
        Ok(Password::from_hash(hash))
    }

    /// Verify a plaintext password against a stored hash.
    pub fn verify(&self, plaintext: &str, password: &Password) -> bool {
        plaintext.len() <= MAX_CREDENTIAL_BYTES
            && self.primitive.verify(plaintext.as_bytes(), password.as_str())
    }
}
