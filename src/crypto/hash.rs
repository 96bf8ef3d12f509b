//! Cryptographic hashing utilities for the blockchain
//!
//! Provides SHA-256 hashing over a canonical JSON rendering of structured
//! records, used for block hashes, the proof-of-work digest, and the
//! ledger integrity digest.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Serializes a value to canonical JSON: object keys sorted, no whitespace.
///
/// Everything that gets hashed goes through this function, so two records
/// with equal field values always produce the same digest. `serde_json`
/// maps are BTreeMap-backed, which makes `to_value` sort object keys.
pub fn canonical_json<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Checks if a hex digest meets the difficulty target
/// The digest must start with `digits` zero hex digits
pub fn meets_difficulty(hash_hex: &str, digits: usize) -> bool {
    hash_hex.len() >= digits && hash_hex.bytes().take(digits).all(|b| b == b'0')
}
