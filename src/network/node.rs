//! The owning node context
//!
//! One `Node` encapsulates the chain state machine and the peer registry
//! behind locks, exposing the operations the HTTP layer calls. There are
//! no ambient instances; tests can run any number of independent nodes.
//!
//! Locking discipline: every mutating operation takes the chain write
//! lock for its full duration, including the proof-of-work search inside
//! `mine`, so there is one logical mutator at a time. Fork resolution
//! fetches peer chains without holding any lock and only takes the write
//! lock for the final adoption, which re-checks candidate length against
//! the current chain.

use crate::core::{
    chain_is_valid, Block, Blockchain, ChainConfig, ChainError, MiningStats,
};
use crate::network::client::{ChainFetcher, HttpChainFetcher};
use crate::network::registry::{NodeRegistry, RegistryError};
use log::{info, warn};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A single blockchain node: chain, peer registry, and peer client
pub struct Node {
    identifier: String,
    chain: RwLock<Blockchain>,
    registry: RwLock<NodeRegistry>,
    fetcher: Box<dyn ChainFetcher>,
}

impl Node {
    /// Create a node that reconciles with peers over HTTP
    pub fn new(config: ChainConfig) -> Self {
        Self::with_fetcher(config, Box::new(HttpChainFetcher::new()))
    }

    /// Create a node with a custom peer fetcher (tests use an in-memory
    /// one)
    pub fn with_fetcher(config: ChainConfig, fetcher: Box<dyn ChainFetcher>) -> Self {
        Self {
            identifier: Uuid::new_v4().simple().to_string(),
            chain: RwLock::new(Blockchain::with_config(config)),
            registry: RwLock::new(NodeRegistry::new()),
            fetcher,
        }
    }

    /// Unique identifier of this node, used as its default miner address
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Validate and enqueue a transfer; returns the index of the block it
    /// is expected to land in
    pub async fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
        sender_nonce: u64,
    ) -> Result<u64, ChainError> {
        self.chain
            .write()
            .await
            .submit_transaction(sender, recipient, amount, sender_nonce)
    }

    /// Mine the next block, crediting the reward to `miner_address`
    pub async fn mine(&self, miner_address: &str) -> Result<(Block, MiningStats), ChainError> {
        self.chain.write().await.mine(miner_address)
    }

    /// Full chain contents and length
    pub async fn get_chain(&self) -> (Vec<Block>, usize) {
        let chain = self.chain.read().await;
        (chain.blocks.clone(), chain.blocks.len())
    }

    pub async fn get_balance(&self, address: &str) -> u64 {
        self.chain.read().await.ledger.balance_of(address)
    }

    pub async fn get_nonce(&self, address: &str) -> Option<u64> {
        self.chain.read().await.ledger.nonce_of(address)
    }

    /// Register a peer endpoint for fork resolution
    pub async fn register_peer(&self, address: &str) -> Result<String, RegistryError> {
        self.registry.write().await.register(address)
    }

    pub async fn peers(&self) -> Vec<String> {
        self.registry.read().await.peers()
    }

    /// Longest-valid-chain fork resolution.
    ///
    /// Queries every registered peer for its chain; per-peer failures are
    /// logged and skipped. Among candidates strictly longer than the
    /// local chain and passing link validation, the longest wins; ties go
    /// to the first observed, and peer order is unspecified. Adoption
    /// replays the candidate into a fresh ledger before swapping. Returns
    /// whether the local chain was replaced.
    pub async fn resolve_conflicts(&self) -> bool {
        let peers = self.registry.read().await.peers();
        let (local_len, difficulty) = {
            let chain = self.chain.read().await;
            (chain.blocks.len(), chain.config.difficulty)
        };

        let mut best: Option<Vec<Block>> = None;
        let mut max_len = local_len;

        for peer in peers {
            match self.fetcher.fetch_chain(&peer).await {
                Ok(remote) => {
                    let candidate = remote.chain;
                    if candidate.len() > max_len && chain_is_valid(&candidate, difficulty) {
                        max_len = candidate.len();
                        best = Some(candidate);
                    }
                }
                Err(err) => {
                    warn!("skipping peer {} during fork resolution: {}", peer, err);
                }
            }
        }

        let Some(candidate) = best else {
            return false;
        };

        let mut chain = self.chain.write().await;
        match chain.adopt_chain(candidate) {
            Ok(replaced) => {
                if replaced {
                    info!("fork resolved: adopted chain of length {}", chain.blocks.len());
                }
                replaced
            }
            Err(err) => {
                warn!("discarding candidate chain: {}", err);
                false
            }
        }
    }
}
