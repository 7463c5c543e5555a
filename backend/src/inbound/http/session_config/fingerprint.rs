//! Short, non-secret identifier for the active session key.
//!
//! Logged at startup so operators can tell which key a node is using (and
//! spot nodes that fell back to an ephemeral key) without printing key
//! material.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of SHA-256 over the key's signing half, hex encoded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use workouttracker::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}
