//! CLI command handlers

use crate::api::{create_router, ApiState};
use crate::core::{Blockchain, ChainConfig};
use crate::network::Node;
use std::sync::Arc;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Start a node and serve its REST API
pub async fn cmd_serve(port: u16, peers: Vec<String>, difficulty: usize) -> CliResult<()> {
    let config = ChainConfig {
        difficulty,
        ..ChainConfig::default()
    };
    let node = Arc::new(Node::new(config));

    println!("🔗 Node identifier: {}", node.identifier());

    for peer in peers {
        match node.register_peer(&peer).await {
            Ok(endpoint) => println!("   Registered peer {}", endpoint),
            Err(e) => log::warn!("Skipping bootstrap peer: {}", e),
        }
    }

    let app = create_router(ApiState { node });
    let addr = format!("0.0.0.0:{}", port);

    println!("🚀 REST API listening on http://localhost:{}", port);
    println!();
    println!("📖 Available endpoints:");
    println!("   GET  /health                  - Health check");
    println!("   GET  /api/chain               - Full chain");
    println!("   POST /api/transactions        - Submit transaction");
    println!("   POST /api/mine                - Mine block");
    println!("   GET  /api/balance/{{address}}   - Balance and nonce");
    println!("   GET  /api/nodes               - List peers");
    println!("   POST /api/nodes/register      - Register peers");
    println!("   POST /api/nodes/resolve       - Resolve forks");
    println!();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Mine blocks against a fresh in-memory chain (local demo; nothing is
/// persisted)
pub fn cmd_mine(address: &str, count: u32, difficulty: usize) -> CliResult<()> {
    let config = ChainConfig {
        difficulty,
        ..ChainConfig::default()
    };
    let mut chain = Blockchain::with_config(config);

    for _ in 0..count {
        let (block, stats) = chain.mine(address)?;
        println!(
            "⛏️  Block {} mined in {}ms ({} attempts, {:.2} H/s)",
            block.index, stats.time_ms, stats.attempts, stats.hash_rate
        );
    }

    println!(
        "💰 {} balance: {} (chain length {})",
        address,
        chain.ledger.balance_of(address),
        chain.len()
    );

    Ok(())
}
