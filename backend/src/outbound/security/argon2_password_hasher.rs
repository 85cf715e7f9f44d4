//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Digests are PHC strings, so the salt and parameters travel with the hash.
//! Hashing is CPU bound and runs on the blocking pool under the caller's
//! trace id.

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest, TraceId};

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

fn hash_blocking(secret: &str) -> Result<PasswordDigest, PasswordHashError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let digest = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;
    Ok(PasswordDigest::new(digest.to_string()))
}

fn verify_blocking(secret: &str, digest: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PasswordHash::new(digest).map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::hash(err.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let secret = Zeroizing::new(password.expose().to_owned());
        TraceId::spawn_blocking(move || hash_blocking(&secret))
            .await
            .map_err(|err| PasswordHashError::hash(format!("hashing task failed: {err}")))?
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let secret = Zeroizing::new(password.to_owned());
        let digest = digest.as_str().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&secret, &digest))
            .await
            .map_err(|err| PasswordHashError::hash(format!("verification task failed: {err}")))?
    }
}
