//! Blockchain: chain assembly, proof-of-work, validation and fork adoption
//!
//! Owns the block sequence together with the ledger and transaction pool
//! it drives: submissions mutate the pool, mining freezes the pool into a
//! block, and the ledger is replayed deterministically from chain
//! contents. Fork adoption swaps the whole chain and rebuilds the ledger
//! by replay before committing, so local state is never left inconsistent
//! with the adopted chain.

use crate::core::block::{validate_block_link, Block};
use crate::core::ledger::{Ledger, LedgerError};
use crate::core::pool::TransactionPool;
use crate::core::transaction::{Transaction, BLOCK_REWARD, MAX_COINS, MINT_ADDRESS};
use log::info;
use std::time::Instant;
use thiserror::Error;

/// Default number of leading zero hex digits required of the PoW digest
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Proof recorded in the genesis block; no search is run for it
pub const GENESIS_PROOF: u64 = 12;

/// Previous-hash marker of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Chain-level errors
#[derive(Error, Debug)]
pub enum ChainError {
    /// A transaction failed ledger validation; surfaced to the caller,
    /// no state change
    #[error("transaction rejected: {0}")]
    Rejected(#[from] LedgerError),
    /// A candidate chain failed link validation or ledger replay; the
    /// candidate is discarded
    #[error("chain validation failed: {0}")]
    ChainValidationFailed(String),
}

/// Consensus and economic parameters of one chain instance
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Leading zero hex digits required of the proof-of-work digest
    pub difficulty: usize,
    /// Reward drawn from the minting account per mined block
    pub reward: u64,
    /// Supply minted to the minting account at genesis
    pub max_coins: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            reward: BLOCK_REWARD,
            max_coins: MAX_COINS,
        }
    }
}

/// Outcome of one proof-of-work search
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Number of proofs tried, including the successful one
    pub attempts: u64,
    /// Wall-clock time of the search in milliseconds
    pub time_ms: u128,
    /// Hashes per second
    pub hash_rate: f64,
}

/// The chain state machine: blocks, derived ledger, and transaction pool
#[derive(Debug, Clone)]
pub struct Blockchain {
    pub blocks: Vec<Block>,
    pub ledger: Ledger,
    pub pool: TransactionPool,
    pub config: ChainConfig,
}

impl Blockchain {
    /// Create a chain with default parameters
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    /// Create a chain, running the genesis bootstrap exactly once: the
    /// supply-minting transaction is staged directly (skipping the pool's
    /// insertion rules), the minting account is seeded through the ledger
    /// bootstrap path, and block 1 is appended with a fixed proof.
    pub fn with_config(config: ChainConfig) -> Self {
        let mut ledger = Ledger::new();
        let mut pool = TransactionPool::new();

        let mint = Transaction::genesis_mint(config.max_coins);
        ledger.bootstrap_mint(MINT_ADDRESS, mint.amount, mint.sender_nonce);
        pool.stage_bootstrap(mint);

        let genesis = Block::new(
            1,
            pool.staged().to_vec(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        );
        pool.clear_staged();

        Self {
            blocks: vec![genesis],
            ledger,
            pool,
            config,
        }
    }

    /// Get the tip block
    pub fn last_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always contains the genesis block")
    }

    /// Number of blocks in the chain
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Validate a transfer against the current ledger and enqueue it.
    /// Returns the index of the block it is expected to land in. A
    /// rejected submission leaves the pool untouched.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: u64,
        sender_nonce: u64,
    ) -> Result<u64, ChainError> {
        self.ledger.validate(sender, amount, sender_nonce)?;
        self.pool
            .submit(Transaction::new(sender, recipient, amount, sender_nonce));
        Ok(self.last_block().index + 1)
    }

    /// Assemble and commit the next block.
    ///
    /// Appends the reward transaction, freezes the pool into the staged
    /// snapshot, brute-forces the proof, then applies the whole batch to a
    /// scratch ledger. The first rejection aborts the block: chain, live
    /// ledger and pending pool are untouched and the staged batch is
    /// discarded.
    pub fn mine(&mut self, miner_address: &str) -> Result<(Block, MiningStats), ChainError> {
        let reward_nonce = self.ledger.nonce_of(MINT_ADDRESS).map_or(1, |n| n + 1);
        self.pool
            .append_reward(Transaction::reward(miner_address, self.config.reward, reward_nonce));
        let staged = self.pool.stage_for_mining();

        let (last_proof, last_hash) = {
            let last = self.last_block();
            (last.proof, last.hash())
        };

        info!(
            "mining block {} at difficulty {} ({} transactions)",
            self.blocks.len() + 1,
            self.config.difficulty,
            staged.len()
        );

        let start = Instant::now();
        let proof = proof_of_work(last_proof, &last_hash, &staged, self.config.difficulty);
        let attempts = proof + 1;

        let mut next_ledger = self.ledger.clone();
        for tx in &staged {
            if let Err(err) = next_ledger.apply(&tx.sender, &tx.recipient, tx.amount, tx.sender_nonce)
            {
                self.pool.clear_staged();
                return Err(ChainError::Rejected(err));
            }
        }

        let block = Block::new(self.blocks.len() as u64 + 1, staged, proof, last_hash);
        self.blocks.push(block.clone());
        self.ledger = next_ledger;
        self.pool.clear_staged();

        let time_ms = start.elapsed().as_millis();
        let hash_rate = if time_ms > 0 {
            attempts as f64 / (time_ms as f64 / 1000.0)
        } else {
            attempts as f64
        };

        info!(
            "block {} mined in {}ms ({} attempts, {:.2} H/s)",
            block.index, time_ms, attempts, hash_rate
        );

        Ok((
            block,
            MiningStats {
                attempts,
                time_ms,
                hash_rate,
            },
        ))
    }

    /// Pairwise link validation of a candidate chain at this chain's
    /// difficulty. Does not re-check ledger legality of historical
    /// transactions; replay at adoption time surfaces that.
    pub fn is_valid_chain(&self, candidate: &[Block]) -> bool {
        chain_is_valid(candidate, self.config.difficulty)
    }

    /// Replace the local chain with a strictly longer, valid candidate.
    ///
    /// The replacement ledger is rebuilt by replaying the candidate from
    /// genesis before anything is swapped, so a candidate that fails
    /// replay leaves local state untouched. Returns `Ok(false)` when the
    /// candidate is not strictly longer than the current chain.
    pub fn adopt_chain(&mut self, candidate: Vec<Block>) -> Result<bool, ChainError> {
        if candidate.len() <= self.blocks.len() {
            return Ok(false);
        }
        if !self.is_valid_chain(&candidate) {
            return Err(ChainError::ChainValidationFailed(
                "candidate failed link validation".to_string(),
            ));
        }

        let ledger = replay_ledger(&candidate)?;
        info!(
            "replacing chain of length {} with candidate of length {}",
            self.blocks.len(),
            candidate.len()
        );
        self.blocks = candidate;
        self.ledger = ledger;
        Ok(true)
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

/// Brute-force search for a proof satisfying the link predicate, starting
/// from zero. No early exit; termination is guaranteed for any reachable
/// difficulty.
pub fn proof_of_work(
    last_proof: u64,
    last_hash: &str,
    transactions: &[Transaction],
    difficulty: usize,
) -> u64 {
    let mut proof = 0;
    while !validate_block_link(last_proof, proof, last_hash, transactions, difficulty) {
        proof += 1;
    }
    proof
}

/// Pairwise link validation, standalone so fork resolution can screen
/// candidates without borrowing a chain instance
pub fn chain_is_valid(blocks: &[Block], difficulty: usize) -> bool {
    for pair in blocks.windows(2) {
        let (prev, block) = (&pair[0], &pair[1]);
        let prev_hash = prev.hash();

        if block.previous_hash != prev_hash {
            return false;
        }
        if !validate_block_link(
            prev.proof,
            block.proof,
            &prev_hash,
            &block.transactions,
            difficulty,
        ) {
            return false;
        }
    }
    true
}

/// Rebuild a ledger by replaying a chain's transactions in order from
/// genesis. The genesis minting transaction goes through the bootstrap
/// path; everything else must pass normal ledger validation.
pub fn replay_ledger(blocks: &[Block]) -> Result<Ledger, ChainError> {
    let mut ledger = Ledger::new();
    for block in blocks {
        for tx in &block.transactions {
            if block.index == 1 && tx.is_genesis_mint() {
                ledger.bootstrap_mint(&tx.recipient, tx.amount, tx.sender_nonce);
            } else {
                ledger
                    .apply(&tx.sender, &tx.recipient, tx.amount, tx.sender_nonce)
                    .map_err(|err| {
                        ChainError::ChainValidationFailed(format!(
                            "replay failed at block {}: {}",
                            block.index, err
                        ))
                    })?;
            }
        }
    }
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::LedgerError;

    fn test_config() -> ChainConfig {
        // One hex digit keeps the search around 16 attempts.
        ChainConfig {
            difficulty: 1,
            ..ChainConfig::default()
        }
    }

    fn test_chain() -> Blockchain {
        Blockchain::with_config(test_config())
    }

    /// Find a proof for `block` that fails the link predicate, so tamper
    /// tests stay deterministic (a blind `proof + 1` could still meet the
    /// target by chance).
    fn invalid_proof(prev: &Block, block: &Block, difficulty: usize) -> u64 {
        let prev_hash = prev.hash();
        let mut proof = block.proof + 1;
        while validate_block_link(prev.proof, proof, &prev_hash, &block.transactions, difficulty) {
            proof += 1;
        }
        proof
    }

    #[test]
    fn test_genesis_bootstrap() {
        let chain = test_chain();

        assert_eq!(chain.len(), 1);
        let genesis = chain.last_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.transactions.len(), 1);
        assert!(genesis.transactions[0].is_genesis_mint());

        assert_eq!(chain.ledger.balance_of(MINT_ADDRESS), MAX_COINS);
        assert_eq!(chain.ledger.nonce_of(MINT_ADDRESS), Some(1));
        assert!(chain.pool.staged().is_empty());
        assert!(chain.pool.is_empty());
    }

    #[test]
    fn test_mining_empty_block_pays_reward() {
        let mut chain = test_chain();
        let (block, stats) = chain.mine("M1").unwrap();

        assert_eq!(block.index, 2);
        assert!(stats.attempts >= 1);
        assert_eq!(chain.ledger.balance_of(MINT_ADDRESS), MAX_COINS - BLOCK_REWARD);
        assert_eq!(chain.ledger.balance_of("M1"), BLOCK_REWARD);
        assert_eq!(chain.ledger.nonce_of(MINT_ADDRESS), Some(2));
    }

    #[test]
    fn test_mined_block_link_validates() {
        let mut chain = test_chain();
        let genesis_hash = chain.last_block().hash();
        let genesis_proof = chain.last_block().proof;

        let (block, _) = chain.mine("M1").unwrap();
        assert_eq!(block.previous_hash, genesis_hash);
        assert!(validate_block_link(
            genesis_proof,
            block.proof,
            &genesis_hash,
            &block.transactions,
            chain.config.difficulty,
        ));
    }

    #[test]
    fn test_submission_requires_funds() {
        let mut chain = test_chain();
        let err = chain.submit_transaction("alice", "bob", 5, 1).unwrap_err();

        assert!(matches!(
            err,
            ChainError::Rejected(LedgerError::InsufficientBalance { .. })
        ));
        assert!(chain.pool.is_empty());
    }

    #[test]
    fn test_user_transactions_are_mined_in_head_first_order() {
        let mut chain = test_chain();
        // Fund two spenders first.
        chain.mine("alice").unwrap();
        chain.mine("carol").unwrap();

        chain.submit_transaction("alice", "bob", 5, 1).unwrap();
        chain.submit_transaction("carol", "dave", 7, 1).unwrap();

        let (block, _) = chain.mine("M1").unwrap();
        assert_eq!(block.transactions.len(), 3);
        // Most recent user submission first, reward last.
        assert_eq!(block.transactions[0].sender, "carol");
        assert_eq!(block.transactions[1].sender, "alice");
        assert_eq!(block.transactions[2].sender, MINT_ADDRESS);

        assert_eq!(chain.ledger.balance_of("bob"), 5);
        assert_eq!(chain.ledger.balance_of("dave"), 7);
        assert_eq!(chain.ledger.balance_of("M1"), BLOCK_REWARD);
    }

    #[test]
    fn test_rejected_batch_aborts_block() {
        let mut chain = test_chain();
        chain.mine("alice").unwrap();

        // Two sequential-nonce transfers from one sender, queued past the
        // submission pre-screen: head insertion stages nonce 2 before
        // nonce 1, so the batch cannot apply in order and the block must
        // abort.
        chain.pool.submit(Transaction::new("alice", "bob", 1, 1));
        chain.pool.submit(Transaction::new("alice", "bob", 1, 2));

        let before_blocks = chain.len();
        let before_digest = chain.ledger.digest();

        let err = chain.mine("M1").unwrap_err();
        assert!(matches!(err, ChainError::Rejected(_)));
        assert_eq!(chain.len(), before_blocks);
        assert_eq!(chain.ledger.digest(), before_digest);
        // The staged batch is discarded, not re-queued.
        assert!(chain.pool.is_empty());
        assert!(chain.pool.staged().is_empty());
    }

    #[test]
    fn test_valid_chain_accepts_mined_history() {
        let mut chain = test_chain();
        chain.mine("M1").unwrap();
        chain.mine("M2").unwrap();

        assert!(chain.is_valid_chain(&chain.blocks));
    }

    #[test]
    fn test_tampered_proof_fails_validation() {
        let mut chain = test_chain();
        chain.mine("M1").unwrap();
        chain.mine("M2").unwrap();

        let mut tampered = chain.blocks.clone();
        tampered[1].proof = invalid_proof(&tampered[0], &tampered[1], chain.config.difficulty);
        assert!(!chain.is_valid_chain(&tampered));
    }

    #[test]
    fn test_tampered_previous_hash_fails_validation() {
        let mut chain = test_chain();
        chain.mine("M1").unwrap();
        chain.mine("M2").unwrap();

        let mut tampered = chain.blocks.clone();
        tampered[2].previous_hash = "0".repeat(64);
        assert!(!chain.is_valid_chain(&tampered));
    }

    #[test]
    fn test_adopt_longer_valid_chain_rebuilds_ledger() {
        let mut local = test_chain();
        local.mine("local-miner").unwrap();

        let mut remote = test_chain();
        for _ in 0..4 {
            remote.mine("remote-miner").unwrap();
        }

        let replaced = local.adopt_chain(remote.blocks.clone()).unwrap();
        assert!(replaced);
        assert_eq!(local.len(), 5);
        assert_eq!(local.ledger, replay_ledger(&remote.blocks).unwrap());
        assert_eq!(
            local.ledger.balance_of("remote-miner"),
            4 * BLOCK_REWARD
        );
        assert_eq!(local.ledger.balance_of("local-miner"), 0);
    }

    #[test]
    fn test_adopt_rejects_equal_or_shorter_chain() {
        let mut local = test_chain();
        local.mine("M1").unwrap();

        let remote = test_chain();
        assert!(!local.adopt_chain(remote.blocks.clone()).unwrap());
        assert_eq!(local.ledger.balance_of("M1"), BLOCK_REWARD);
    }

    #[test]
    fn test_adopt_rejects_tampered_chain() {
        let mut local = test_chain();

        let mut remote = test_chain();
        remote.mine("M1").unwrap();
        remote.mine("M2").unwrap();
        let mut candidate = remote.blocks.clone();
        candidate[1].proof = invalid_proof(&candidate[0], &candidate[1], remote.config.difficulty);

        let err = local.adopt_chain(candidate).unwrap_err();
        assert!(matches!(err, ChainError::ChainValidationFailed(_)));
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn test_adopt_rejects_chain_that_fails_replay() {
        let mut local = test_chain();

        // Build a candidate whose links are valid but whose transactions
        // cannot replay: the final block spends from the minting account
        // with a nonce far ahead of its recorded one.
        let mut remote = test_chain();
        remote.mine("M1").unwrap();
        let tip = remote.last_block().clone();
        let bogus = vec![Transaction::new(MINT_ADDRESS, "x", 1, 99)];
        let proof = proof_of_work(tip.proof, &tip.hash(), &bogus, remote.config.difficulty);
        let block = Block::new(tip.index + 1, bogus, proof, tip.hash());
        let mut candidate = remote.blocks.clone();
        candidate.push(block);

        let err = local.adopt_chain(candidate).unwrap_err();
        assert!(matches!(err, ChainError::ChainValidationFailed(_)));
        assert_eq!(local.len(), 1);
        assert_eq!(local.ledger.balance_of(MINT_ADDRESS), MAX_COINS);
    }

    #[test]
    fn test_replay_matches_incremental_ledger() {
        let mut chain = test_chain();
        chain.mine("alice").unwrap();
        chain.submit_transaction("alice", "bob", 3, 1).unwrap();
        chain.mine("M1").unwrap();

        assert_eq!(replay_ledger(&chain.blocks).unwrap(), chain.ledger);
    }
}
