//! Nanochain: a minimal account-based blockchain in Rust
//!
//! This crate provides a single-process ledger featuring:
//! - An append-only chain of blocks secured by brute-force proof-of-work
//! - Account balances with replay-protection nonces, replayed
//!   deterministically from chain contents
//! - A pending/staged transaction pool feeding block construction
//! - Longest-valid-chain fork resolution across HTTP peers
//! - A REST API surface for transactions, mining and peer management
//!
//! # Example
//!
//! ```rust
//! use nanochain::core::{Blockchain, ChainConfig, BLOCK_REWARD};
//!
//! // Low difficulty keeps the proof search short.
//! let mut chain = Blockchain::with_config(ChainConfig {
//!     difficulty: 1,
//!     ..ChainConfig::default()
//! });
//!
//! let (block, stats) = chain.mine("miner-1").unwrap();
//! assert_eq!(block.index, 2);
//! assert!(stats.attempts >= 1);
//! assert_eq!(chain.ledger.balance_of("miner-1"), BLOCK_REWARD);
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod crypto;
pub mod network;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use core::{
    Block, Blockchain, ChainConfig, ChainError, Ledger, LedgerError, MiningStats, Transaction,
    TransactionPool, BLOCK_REWARD, DEFAULT_DIFFICULTY, MAX_COINS, MINT_ADDRESS,
};
pub use network::{ChainFetcher, FetchError, HttpChainFetcher, Node, NodeRegistry, RegistryError};
