//! CLI command implementations

pub mod commands;

pub use commands::{cmd_mine, cmd_serve, CliResult};
