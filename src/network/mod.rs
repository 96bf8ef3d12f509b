//! Networking module
//!
//! Peer bookkeeping and pull-based chain reconciliation:
//! - Peer registry (`host:port` endpoints, consulted by fork resolution)
//! - Peer chain fetching over HTTP with bounded per-peer timeouts
//! - The owning `Node` context exposing the operations the HTTP layer
//!   calls

pub mod client;
pub mod node;
pub mod registry;

pub use client::{ChainFetcher, FetchError, HttpChainFetcher, RemoteChain, PEER_TIMEOUT};
pub use node::Node;
pub use registry::{NodeRegistry, RegistryError};
