//! Password hashing with Argon2id (PHC string format)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

use crate::error::{AppError, Result};

/// Well-formed hash no password matches, with the default Argon2 cost
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its stored hash
///
/// Returns `InvalidCredentials` on mismatch and an internal error when the
/// stored hash cannot be parsed.
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> Result<()> {
    let parsed_hash =
        PasswordHash::new(password_hash.as_ref()).map_err(|e| AppError::PasswordHash {
            reason: e.to_string(),
        })?;

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)
}

/// Spends the same work as [`verify_password`] for an account that does
/// not exist, so login latency does not reveal registered emails.
pub fn verify_against_dummy(password: impl AsRef<str>) {
    if let Err(e) = verify_password(password, DUMMY_HASH) {
        if e.is_internal() {
            tracing::warn!(error = %e, "dummy password hash rejected");
        }
    }
}
