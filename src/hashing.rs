use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::types::SaltedHash;

/// Raw salt length in bytes (32 hex characters once encoded).
pub const SALT_BYTES: usize = 16;

/// Length of a hex-encoded salt.
pub const SALT_HEX_LEN: usize = SALT_BYTES * 2;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Generate a fresh salt from the operating system CSPRNG.
pub fn generate_salt() -> Result<String, StoreError> {
    generate_salt_with(&mut OsRng)
}

/// Generate a salt from the given random source, hex-encoded in lowercase.
///
/// A failing source is reported as [`StoreError::HashFailure`].
pub fn generate_salt_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, StoreError> {
    let mut bytes = [0u8; SALT_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| StoreError::HashFailure(format!("random source unavailable: {e}")))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 over the UTF-8 bytes of `secret` followed by the UTF-8 bytes of `salt_hex`.
///
/// The salt is mixed in as its hex text, not decoded back to raw bytes, so
/// registration and later verification must both go through this function.
pub fn digest(secret: &str, salt_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt_hex.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The standalone "salt and hash this password" tool.
///
/// An empty secret produces no output rather than an error.
pub fn salt_and_hash(secret: &str) -> Result<Option<SaltedHash>, StoreError> {
    if secret.is_empty() {
        return Ok(None);
    }
    let salt = generate_salt()?;
    let digest = digest(secret, &salt);
    Ok(Some(SaltedHash { salt, digest }))
}

/// True if `text` looks like a salt this crate produces: 32 lowercase hex characters.
pub fn is_valid_salt(text: &str) -> bool {
    is_lower_hex(text, SALT_HEX_LEN)
}

/// True if `text` looks like a digest: 64 lowercase hex characters.
pub fn is_valid_digest(text: &str) -> bool {
    is_lower_hex(text, DIGEST_HEX_LEN)
}

fn is_lower_hex(text: &str, len: usize) -> bool {
    text.len() == len && text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
