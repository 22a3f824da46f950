//! Salted password hashing.
//!
//! Stored form is `"{salt_hex}${digest_hex}"` where the digest is
//! SHA-256 over the salt followed by the password.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hashes a password under a fresh 16-byte random salt.
pub(crate) fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = digest_hex(&salt_hex, password);
    format!("{salt_hex}${digest}")
}

/// Checks a password against a stored `salt$digest` hash.
///
/// Unparseable stored values verify as false rather than erroring.
pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    digest_hex(salt_hex, password) == expected
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
