//! Peer registry
//!
//! A deduplicated set of known peer endpoints, consulted only during fork
//! resolution. No liveness tracking, no removal, no bounded size.

use std::collections::HashSet;
use thiserror::Error;

/// Peer registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid peer URL: {0}")]
    InvalidPeerUrl(String),
}

/// Known peer endpoints as normalized `host:port` strings
///
/// Iteration order is unspecified; fork resolution must not depend on it.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer endpoint, accepting `host:port` or an
    /// `http(s)://host:port[/path]` URL. Returns the normalized form.
    pub fn register(&mut self, address: &str) -> Result<String, RegistryError> {
        let endpoint = normalize_endpoint(address)?;
        self.nodes.insert(endpoint.clone());
        Ok(endpoint)
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.nodes.contains(endpoint)
    }

    pub fn peers(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Reduce a peer address to `host:port`, rejecting anything without a
/// non-empty host and a valid port
fn normalize_endpoint(address: &str) -> Result<String, RegistryError> {
    let trimmed = address.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed);
    let host_port = rest.split('/').next().unwrap_or_default();

    let (host, port) = host_port
        .rsplit_once(':')
        .ok_or_else(|| RegistryError::InvalidPeerUrl(address.to_string()))?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(RegistryError::InvalidPeerUrl(address.to_string()));
    }

    Ok(host_port.to_string())
}
