//! Nanochain CLI Application
//!
//! Starts a node with its REST API, or runs local demo mining.

use clap::{Parser, Subcommand};
use nanochain::cli;
use nanochain::core::DEFAULT_DIFFICULTY;

#[derive(Parser)]
#[command(name = "nanochain")]
#[command(version = "0.1.0")]
#[command(about = "A minimal account-based proof-of-work blockchain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a node and serve its REST API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Initial peers to register (comma-separated host:port)
        #[arg(long)]
        peers: Option<String>,

        /// Leading zero hex digits required of the proof-of-work digest
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,
    },

    /// Mine blocks against a fresh in-memory chain (local demo)
    Mine {
        /// Miner's address for receiving rewards
        #[arg(short, long)]
        address: String,

        /// Number of blocks to mine
        #[arg(short, long, default_value = "1")]
        count: u32,

        /// Leading zero hex digits required of the proof-of-work digest
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            peers,
            difficulty,
        } => {
            let peers: Vec<String> = peers
                .map(|p| p.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cli::cmd_serve(port, peers, difficulty))
        }

        Commands::Mine {
            address,
            count,
            difficulty,
        } => cli::cmd_mine(&address, count, difficulty),
    }
}
