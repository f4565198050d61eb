//! Identity Generator - migration ids and content checksums

use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a unique, creation-ordered migration id.
///
/// Millisecond epoch timestamp followed by 4 random bytes hex-encoded.
/// The timestamp prefix makes lexicographic order match creation order;
/// the random suffix avoids collisions within the same instant.
pub fn new_migration_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut suffix = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut suffix);
    format!("{}{}", millis, hex::encode(suffix))
}

/// Hex-encoded SHA-256 digest of the exact SQL bytes.
///
/// Used for integrity verification of stored migration SQL, not security.
pub fn checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hex::encode(hasher.finalize())
}
