//! Block structure and proof-of-work link validation
//!
//! A block freezes an ordered transaction batch into the chain. Transaction
//! order is part of the hashed proof-of-work input, so reordering an
//! otherwise identical batch invalidates a previously found proof.

use crate::core::transaction::Transaction;
use crate::crypto::{canonical_json, meets_difficulty, sha256_hex};
use serde::{Deserialize, Serialize};

/// A block in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain
    pub index: u64,
    /// Unix seconds at construction time
    pub timestamp: i64,
    /// Ordered transaction batch; the order is hashed
    pub transactions: Vec<Transaction>,
    /// Proof-of-work solution found for this block
    pub proof: u64,
    /// Hex digest of the preceding block (the literal "1" for genesis)
    pub previous_hash: String,
}

impl Block {
    /// Create a block stamped with the current time
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: chrono::Utc::now().timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 over the canonical JSON rendering of the whole block
    pub fn hash(&self) -> String {
        sha256_hex(canonical_json(self).as_bytes())
    }
}

/// Proof-of-work link predicate.
///
/// Recomputes `sha256(last_proof || proof || last_hash || txs_json)` and
/// requires `difficulty` leading zero hex digits. Pure function; callers
/// always pass an explicit transaction slice, empty or not.
pub fn validate_block_link(
    last_proof: u64,
    proof: u64,
    last_hash: &str,
    transactions: &[Transaction],
    difficulty: usize,
) -> bool {
    let guess = format!(
        "{}{}{}{}",
        last_proof,
        proof,
        last_hash,
        canonical_json(&transactions)
    );
    meets_difficulty(&sha256_hex(guess.as_bytes()), difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_proof(last_proof: u64, last_hash: &str, txs: &[Transaction], difficulty: usize) -> u64 {
        let mut proof = 0;
        while !validate_block_link(last_proof, proof, last_hash, txs, difficulty) {
            proof += 1;
        }
        proof
    }

    #[test]
    fn test_hash_is_deterministic() {
        let block = Block::new(2, vec![Transaction::new("a", "b", 1, 1)], 7, "1".to_string());
        assert_eq!(block.hash(), block.hash());
        assert_eq!(block.hash().len(), 64);
    }

    #[test]
    fn test_hash_changes_with_any_field() {
        let block = Block::new(2, vec![], 7, "1".to_string());
        let mut tampered = block.clone();
        tampered.proof += 1;
        assert_ne!(block.hash(), tampered.hash());
    }

    #[test]
    fn test_found_proof_validates() {
        let txs = vec![Transaction::new("alice", "bob", 3, 1)];
        let proof = find_proof(12, "abc123", &txs, 1);
        assert!(validate_block_link(12, proof, "abc123", &txs, 1));
    }

    #[test]
    fn test_reordering_transactions_invalidates_proof() {
        let txs = vec![
            Transaction::new("alice", "bob", 3, 1),
            Transaction::new("carol", "dave", 4, 1),
        ];
        let reordered = vec![txs[1].clone(), txs[0].clone()];

        // The transaction order feeds the hashed preimage, so the two
        // batches search different puzzles.
        assert_ne!(canonical_json(&txs), canonical_json(&reordered));

        // A 4-digit target leaves a stale proof a 1-in-65536 chance of
        // surviving the reorder.
        let proof = find_proof(12, "abc123", &txs, 4);
        assert!(validate_block_link(12, proof, "abc123", &txs, 4));
        assert!(!validate_block_link(12, proof, "abc123", &reordered, 4));
    }

    #[test]
    fn test_empty_batch_is_passed_explicitly() {
        let proof = find_proof(12, "abc123", &[], 1);
        assert!(validate_block_link(12, proof, "abc123", &[], 1));
    }
}
