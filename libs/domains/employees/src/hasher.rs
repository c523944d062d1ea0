use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use crate::error::{EmployeeError, EmployeeResult};
use crate::models::Password;

/// Well-formed Argon2id digest at the default cost that belongs to no
/// account. Logins for unknown emails verify against it so both failure
/// paths pay for one hash.
pub(crate) const DECOY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Digest to store in place of the password
    async fn hash(&self, password: &Password) -> EmployeeResult<String>;

    /// Whether `password` produces `digest`. A digest that cannot be parsed
    /// is an error, a plain mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, digest: &str) -> EmployeeResult<bool>;
}

/// Argon2id with the crate's default parameters, run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, password: &Password) -> EmployeeResult<String> {
        let password = password.expose().to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| EmployeeError::PasswordHash(e.to_string()))
        })
        .await
        .map_err(|e| EmployeeError::Internal(format!("hashing task failed: {e}")))?
    }

    async fn verify(&self, password: &str, digest: &str) -> EmployeeResult<bool> {
        let password = password.to_owned();
        let digest = digest.to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed =
                PasswordHash::new(&digest).map_err(|e| EmployeeError::PasswordHash(e.to_string()))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|e| EmployeeError::Internal(format!("verification task failed: {e}")))?
    }
}
