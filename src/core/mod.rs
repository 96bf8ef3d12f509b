//! Core blockchain components
//!
//! This module contains the single state machine at the heart of the node:
//! - Transactions (account model with replay-protection nonces)
//! - Blocks (canonical-JSON hashing, proof-of-work link validation)
//! - Ledger (balances and nonces, derived from chain history)
//! - Transaction pool (pending queue plus the staged mining snapshot)
//! - Blockchain (genesis bootstrap, mining, validation, fork adoption)

pub mod block;
pub mod blockchain;
pub mod ledger;
pub mod pool;
pub mod transaction;

pub use block::{validate_block_link, Block};
pub use blockchain::{
    chain_is_valid, proof_of_work, replay_ledger, Blockchain, ChainConfig, ChainError,
    MiningStats, DEFAULT_DIFFICULTY, GENESIS_PREVIOUS_HASH, GENESIS_PROOF,
};
pub use ledger::{Account, Ledger, LedgerError};
pub use pool::TransactionPool;
pub use transaction::{Transaction, BLOCK_REWARD, GENESIS_SENDER, MAX_COINS, MINT_ADDRESS};
