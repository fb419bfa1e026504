//! Cryptographic utilities shared across FoodHub crates
//!
//! Passwords are hashed using SHA-256 with random salts and verified with a
//! constant-time comparison. Session tokens are random and only their
//! digest is stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| Error::Internal(format!("Failed to generate random bytes: {}", e)))?;
    Ok(bytes)
}

fn salted_digest(secret: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}

/// Hash a password for storage.
///
/// The stored format is `hex(salt):hex(sha256(password || salt))`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt: [u8; 32] = random_bytes()?;
    Ok(format!(
        "{}:{}",
        hex::encode(salt),
        hex::encode(salted_digest(password, &salt))
    ))
}

/// Verify a password against a stored hash using constant-time comparison.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored_hash.split_once(':') else {
        return false;
    };

    let (Ok(salt), Ok(hash)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };

    let candidate_hash = salted_digest(candidate, &salt);
    if hash.len() != candidate_hash.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in hash.iter().zip(candidate_hash.iter()) {
        result |= a ^ b;
    }
    result == 0
}

/// Generate an opaque session token: 32 random bytes, URL-safe base64 (43 chars).
pub fn generate_token() -> Result<String> {
    let bytes: [u8; 32] = random_bytes()?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Deterministic digest used to look a token up without storing it.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
