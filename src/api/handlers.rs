//! REST API handlers for node operations

use crate::core::{Block, MiningStats};
use crate::network::Node;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub node: Arc<Node>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node: String,
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize)]
pub struct SubmitTransactionResponse {
    pub message: String,
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub block: Block,
    pub attempts: u64,
    pub time_ms: u128,
}

impl MineResponse {
    fn new(block: Block, stats: MiningStats) -> Self {
        Self {
            block,
            attempts: stats.attempts,
            time_ms: stats.time_ms,
        }
    }
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: u64,
    pub nonce: Option<u64>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: usize,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub length: usize,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct SubmitTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
    pub sender_nonce: u64,
    /// Accepted and ignored; reserved for a future verification stage
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct MineRequest {
    /// Reward recipient; defaults to the node identifier
    #[serde(default)]
    pub miner_address: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        node: state.node.identifier().to_string(),
    })
}

/// GET /api/chain - Full chain contents and length
pub async fn get_chain(State(state): State<ApiState>) -> Json<ChainResponse> {
    let (chain, length) = state.node.get_chain().await;
    Json(ChainResponse { chain, length })
}

/// POST /api/transactions - Submit a transfer to the pending pool
pub async fn submit_transaction(
    State(state): State<ApiState>,
    Json(req): Json<SubmitTransactionRequest>,
) -> Result<(StatusCode, Json<SubmitTransactionResponse>), (StatusCode, Json<ApiError>)> {
    match state
        .node
        .submit_transaction(&req.sender, &req.recipient, req.amount, req.sender_nonce)
        .await
    {
        Ok(block_index) => Ok((
            StatusCode::CREATED,
            Json(SubmitTransactionResponse {
                message: format!("Transaction queued for block {}", block_index),
                block_index,
            }),
        )),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: e.to_string(),
            }),
        )),
    }
}

/// POST /api/mine - Mine the next block
pub async fn mine_block(
    State(state): State<ApiState>,
    Json(req): Json<MineRequest>,
) -> Result<Json<MineResponse>, (StatusCode, Json<ApiError>)> {
    let miner = req
        .miner_address
        .unwrap_or_else(|| state.node.identifier().to_string());

    match state.node.mine(&miner).await {
        Ok((block, stats)) => Ok(Json(MineResponse::new(block, stats))),
        Err(e) => Err((
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!("Mining failed: {}", e),
            }),
        )),
    }
}

/// GET /api/balance/{address} - Balance and nonce of an address
pub async fn get_balance(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> Json<BalanceResponse> {
    let balance = state.node.get_balance(&address).await;
    let nonce = state.node.get_nonce(&address).await;
    Json(BalanceResponse {
        address,
        balance,
        nonce,
    })
}

/// GET /api/nodes - List registered peers
pub async fn list_nodes(State(state): State<ApiState>) -> Json<NodesResponse> {
    Json(NodesResponse {
        nodes: state.node.peers().await,
    })
}

/// POST /api/nodes/register - Register peer endpoints
pub async fn register_nodes(
    State(state): State<ApiState>,
    Json(req): Json<RegisterNodesRequest>,
) -> Result<(StatusCode, Json<RegisterNodesResponse>), (StatusCode, Json<ApiError>)> {
    for node in &req.nodes {
        if let Err(e) = state.node.register_peer(node).await {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: e.to_string(),
                }),
            ));
        }
    }

    let total_nodes = state.node.peers().await.len();
    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: format!("Registered {} node(s)", req.nodes.len()),
            total_nodes,
        }),
    ))
}

/// POST /api/nodes/resolve - Run longest-valid-chain fork resolution
pub async fn resolve_conflicts(State(state): State<ApiState>) -> Json<ResolveResponse> {
    let replaced = state.node.resolve_conflicts().await;
    let (_, length) = state.node.get_chain().await;
    Json(ResolveResponse { replaced, length })
}
