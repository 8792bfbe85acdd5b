//! Content hashing for agreement documents.
//!
//! The hash links a signing to the exact agreement text it attests to, so it
//! is always computed here and never taken from a caller.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of raw bytes as lower-case hex.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Compute the content hash stored on a legal agreement.
pub fn content_hash(content: &str) -> String {
    compute_hash(content.as_bytes())
}
