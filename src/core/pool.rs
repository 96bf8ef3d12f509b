//! Transaction pool: pending submissions and the staged mining snapshot
//!
//! Two buffers with distinct lifecycles. `pending` is mutable and receives
//! new submissions; `staged` is a snapshot frozen exactly once per mining
//! attempt and consumed into the next block. Insertion discipline is
//! policy: user transactions go to the head, reward transactions to the
//! tail, and the resulting order is hashed into the proof-of-work input.

use crate::core::transaction::Transaction;
use std::collections::VecDeque;

/// Pending transaction queue plus the frozen mining snapshot
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    pending: VecDeque<Transaction>,
    staged: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a user transaction at the head of the pending queue, so the
    /// most recently submitted user transactions come first in the next
    /// staged batch
    pub fn submit(&mut self, tx: Transaction) {
        self.pending.push_front(tx);
    }

    /// Enqueue a reward transaction at the tail, after every user
    /// transaction already pending
    pub fn append_reward(&mut self, tx: Transaction) {
        self.pending.push_back(tx);
    }

    /// Genesis-only path: place a transaction directly into the staged
    /// buffer, skipping the pending queue and its insertion rules
    pub fn stage_bootstrap(&mut self, tx: Transaction) {
        self.staged.push(tx);
    }

    /// Move everything pending into the staged snapshot and return a copy
    /// of it. Calling this again before the staged block commits would
    /// silently drop the previous snapshot, so `Blockchain::mine` is the
    /// only caller and stages at most once per cycle.
    pub fn stage_for_mining(&mut self) -> Vec<Transaction> {
        self.staged = self.pending.drain(..).collect();
        self.staged.clone()
    }

    /// Drop the staged snapshot once its block has committed (or been
    /// abandoned)
    pub fn clear_staged(&mut self) {
        self.staged.clear();
    }

    pub fn staged(&self) -> &[Transaction] {
        &self.staged
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
