//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chain
        .route("/api/chain", get(handlers::get_chain))
        // Transactions
        .route("/api/transactions", post(handlers::submit_transaction))
        // Mining
        .route("/api/mine", post(handlers::mine_block))
        // Accounts
        .route("/api/balance/{address}", get(handlers::get_balance))
        // Peers
        .route("/api/nodes", get(handlers::list_nodes))
        .route("/api/nodes/register", post(handlers::register_nodes))
        .route("/api/nodes/resolve", post(handlers::resolve_conflicts))
        // Add state and middleware
        .with_state(state)
        .layer(cors)
}
