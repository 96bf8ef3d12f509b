//! REST API module
//!
//! HTTP surface the node exposes; the core state machine lives behind
//! [`crate::network::Node`].
//!
//! # Endpoints
//!
//! - `GET  /health` - Health check and node identifier
//! - `GET  /api/chain` - Full chain and length
//! - `POST /api/transactions` - Submit a transfer
//! - `POST /api/mine` - Mine the next block
//! - `GET  /api/balance/{address}` - Balance and nonce
//! - `GET  /api/nodes` - List registered peers
//! - `POST /api/nodes/register` - Register peer endpoints
//! - `POST /api/nodes/resolve` - Longest-valid-chain fork resolution

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::create_router;
