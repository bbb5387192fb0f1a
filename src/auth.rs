//! Argon2id hashing for admin passwords.
//!
//! Hashes are stored as PHC strings so the algorithm parameters and salt travel
//! with the hash. Verification goes through `argon2`'s own comparison, which is
//! constant time.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::PasswordError;

/// Shortest password `set_admin_password` accepts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// A malformed or empty hash never verifies; it is not an error because the
/// seeded admin row deliberately carries an empty hash until a password is set.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Well-formed Argon2id hash with the default parameters and an all-zero
/// output. Nothing the login form sends is expected to match it.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Spend one full Argon2 verification on `password` and report failure. Used
/// when there is no stored hash to check against, so a missing account costs
/// as much time as a wrong password.
pub fn reject_without_hash(password: &str) -> bool {
    let _ = verify_password(password, DUMMY_HASH);
    false
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}
