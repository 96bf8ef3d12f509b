//! Transaction types for the blockchain
//!
//! A transaction moves value from a sender account to a recipient account
//! and carries the sender's claimed nonce for replay protection. Reward
//! and genesis transactions mint value out of the designated accounts.

use serde::{Deserialize, Serialize};

/// Reward paid from the minting account for each mined block
pub const BLOCK_REWARD: u64 = 20;

/// Total supply minted to the minting account at genesis
pub const MAX_COINS: u64 = 1_000_000_000;

/// Account from which the initial supply and mining rewards are drawn
pub const MINT_ADDRESS: &str = "mint";

/// Sentinel sender of the genesis minting transaction
pub const GENESIS_SENDER: &str = "0";

/// A value transfer between two accounts
///
/// Identity is value equality of the fields; there is no transaction id.
/// The field set is also the wire format, hashed as canonical JSON, so
/// every field (including an absent signature) is always serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sending address
    pub sender: String,
    /// Receiving address
    pub recipient: String,
    /// Amount in minor currency units
    pub amount: u64,
    /// The nonce the sender claims for this transfer; must be exactly one
    /// more than the sender's last recorded nonce to apply
    pub sender_nonce: u64,
    /// Reserved for a future verification stage; not checked by the core
    pub signature: Option<String>,
}

impl Transaction {
    /// Create a user transaction (unsigned)
    pub fn new(sender: &str, recipient: &str, amount: u64, sender_nonce: u64) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
            sender_nonce,
            signature: None,
        }
    }

    /// Create a mining reward transaction drawn from the minting account
    pub fn reward(recipient: &str, amount: u64, sender_nonce: u64) -> Self {
        Self::new(MINT_ADDRESS, recipient, amount, sender_nonce)
    }

    /// Create the genesis transaction that mints the initial supply
    pub fn genesis_mint(max_coins: u64) -> Self {
        Self::new(GENESIS_SENDER, MINT_ADDRESS, max_coins, 1)
    }

    /// True for the single supply-minting transaction in the genesis block
    pub fn is_genesis_mint(&self) -> bool {
        self.sender == GENESIS_SENDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::canonical_json;

    #[test]
    fn test_value_equality() {
        let a = Transaction::new("alice", "bob", 5, 1);
        let b = Transaction::new("alice", "bob", 5, 1);
        let c = Transaction::new("alice", "bob", 6, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reward_is_drawn_from_mint() {
        let tx = Transaction::reward("miner-1", BLOCK_REWARD, 2);
        assert_eq!(tx.sender, MINT_ADDRESS);
        assert_eq!(tx.recipient, "miner-1");
        assert_eq!(tx.amount, BLOCK_REWARD);
    }

    #[test]
    fn test_genesis_mint_shape() {
        let tx = Transaction::genesis_mint(MAX_COINS);
        assert!(tx.is_genesis_mint());
        assert_eq!(tx.recipient, MINT_ADDRESS);
        assert_eq!(tx.sender_nonce, 1);
    }

    #[test]
    fn test_canonical_form_includes_absent_signature() {
        let tx = Transaction::new("alice", "bob", 5, 1);
        assert_eq!(
            canonical_json(&tx),
            r#"{"amount":5,"recipient":"bob","sender":"alice","sender_nonce":1,"signature":null}"#
        );
    }
}
