//! Peer chain fetching for fork resolution
//!
//! Fork resolution pulls each registered peer's full chain over HTTP. The
//! fetch sits behind a trait so tests can substitute an in-memory fetcher
//! and so peer I/O stays out of the core state machine.

use crate::core::Block;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Per-peer request timeout during fork resolution. One unreachable peer
/// must not stall evaluation of the others.
pub const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-peer fetch failures; logged and skipped, never fatal to resolution
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("peer unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("peer returned status {0}")]
    BadStatus(u16),
}

/// Wire shape of a peer's `GET /api/chain` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Fetches a peer's full chain
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, endpoint: &str) -> Result<RemoteChain, FetchError>;
}

/// HTTP fetcher used by running nodes
pub struct HttpChainFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChainFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: PEER_TIMEOUT,
        }
    }
}

impl Default for HttpChainFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, endpoint: &str) -> Result<RemoteChain, FetchError> {
        let url = format!("http://{}/api/chain", endpoint);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status().as_u16()));
        }

        Ok(response.json::<RemoteChain>().await?)
    }
}
