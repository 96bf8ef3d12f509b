//! Account ledger: balances and replay-protection nonces
//!
//! The ledger is derived state, fully reconstructible by replaying every
//! block's transactions in order from genesis. An account's nonce must
//! advance by exactly one per applied transaction where the account is the
//! sender; a submitted nonce that is not `stored + 1` is the double-spend
//! guard tripping.

use crate::crypto::{canonical_json, sha256_hex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Reasons a transaction fails ledger validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance for {address}: have {balance}, need {amount}")]
    InsufficientBalance {
        address: String,
        balance: u64,
        amount: u64,
    },
    #[error("unknown sender account: {0}")]
    UnknownSender(String),
    #[error("nonce mismatch for {address}: expected {expected}, got {got}")]
    NonceMismatch {
        address: String,
        expected: u64,
        got: u64,
    },
}

/// Balance and nonce of one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    pub nonce: u64,
}

/// Mapping from address to account
///
/// Accounts are created lazily on first deposit and never deleted. The
/// backing map is a `BTreeMap` so the integrity digest serializes with
/// stable key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_account(&self, address: &str) -> bool {
        self.accounts.contains_key(address)
    }

    /// Balance of an address, 0 if the account is unknown
    pub fn balance_of(&self, address: &str) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.balance)
    }

    /// Last recorded nonce of an address, `None` if it never transacted.
    /// `None` is distinct from `Some(0)`: a freshly credited account sits
    /// at nonce 0 and its first transfer must claim nonce 1.
    pub fn nonce_of(&self, address: &str) -> Option<u64> {
        self.accounts.get(address).map(|a| a.nonce)
    }

    /// Check whether a transfer could apply against the current state,
    /// without applying it
    pub fn validate(&self, sender: &str, amount: u64, sender_nonce: u64) -> Result<(), LedgerError> {
        let balance = self.balance_of(sender);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                address: sender.to_string(),
                balance,
                amount,
            });
        }

        match self.nonce_of(sender) {
            None => Err(LedgerError::UnknownSender(sender.to_string())),
            Some(stored) if sender_nonce == stored + 1 => Ok(()),
            Some(stored) => Err(LedgerError::NonceMismatch {
                address: sender.to_string(),
                expected: stored + 1,
                got: sender_nonce,
            }),
        }
    }

    /// Apply a transfer: debit sender, credit recipient (creating it if
    /// absent), advance the sender's nonce by exactly one. No effect on
    /// rejection.
    pub fn apply(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: u64,
        sender_nonce: u64,
    ) -> Result<(), LedgerError> {
        self.validate(sender, amount, sender_nonce)?;

        self.withdraw(sender, amount);
        self.deposit(recipient, amount);
        if let Some(account) = self.accounts.get_mut(sender) {
            account.nonce += 1;
        }

        Ok(())
    }

    /// Genesis-only path: create the minting account with its initial
    /// supply and nonce directly, bypassing the sender-must-exist rule
    /// that `apply` enforces.
    pub fn bootstrap_mint(&mut self, address: &str, amount: u64, nonce: u64) {
        self.accounts
            .insert(address.to_string(), Account { balance: amount, nonce });
    }

    /// SHA-256 hex digest over the canonical serialization of the whole
    /// account mapping. Used for integrity checks, not consensus.
    pub fn digest(&self) -> String {
        sha256_hex(canonical_json(&self.accounts).as_bytes())
    }

    fn deposit(&mut self, address: &str, amount: u64) {
        let account = self
            .accounts
            .entry(address.to_string())
            .or_insert(Account { balance: 0, nonce: 0 });
        account.balance += amount;
    }

    fn withdraw(&mut self, address: &str, amount: u64) {
        if let Some(account) = self.accounts.get_mut(address) {
            account.balance -= amount;
        }
    }
}
