//! Credential store: normalized username to Argon2 secret hash

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::keys::{normalize, Identity, NormalizedKey};
use crate::error::{AppError, AppResult};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verified against when the username is unknown, so both failure paths cost the same
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_secret("bookshelf-dummy-secret").unwrap_or_default());

/// Hash a secret using Argon2
pub fn hash_secret(secret: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a secret against a stored PHC hash. A malformed hash never verifies.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Check a login attempt against the hash stored for `key`, if any.
/// Unknown usernames and wrong secrets fail with the same error.
pub fn check_login(key: Identity, stored: Option<&str>, secret: &str) -> AppResult<Identity> {
    match stored {
        Some(hash) if verify_secret(secret, hash) => Ok(key),
        Some(_) => Err(AppError::Authentication(INVALID_CREDENTIALS.to_string())),
        None => {
            let _ = verify_secret(secret, &DUMMY_HASH);
            Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()))
        }
    }
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    secrets: HashMap<NormalizedKey, String>,
}

impl CredentialStore {
    pub fn contains(&self, username: &str) -> bool {
        self.secrets.contains_key(&normalize(username))
    }

    /// Store an already hashed secret. Write-once per username.
    pub fn register(&mut self, username: &str, secret_hash: String) -> AppResult<()> {
        let key = normalize(username);
        if self.secrets.contains_key(&key) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        self.secrets.insert(key, secret_hash);
        Ok(())
    }

    /// Copy of the stored hash, so it can be checked after the store guard is released
    pub fn stored_hash(&self, key: &NormalizedKey) -> Option<String> {
        self.secrets.get(key).cloned()
    }

    pub fn remove(&mut self, key: &NormalizedKey) -> bool {
        self.secrets.remove(key).is_some()
    }
}
