//! Salted credential hashing.
//!
//! Format: `base64(salt)$base64(sha256(salt || password))` with a 16-byte
//! random salt per credential. Verification decodes the stored salt,
//! recomputes the digest and compares in constant time.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", BASE64.encode(salt), BASE64.encode(digest))
}

/// Verify a password against a stored `salt$digest` credential.
///
/// Returns `false` for malformed stored values rather than erroring; a
/// corrupt credential behaves like a wrong password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(digest)) = (BASE64.decode(salt_b64), BASE64.decode(digest_b64)) else {
        return false;
    };
    let computed = salted_digest(&salt, password);
    constant_time_eq(&computed, &digest)
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
