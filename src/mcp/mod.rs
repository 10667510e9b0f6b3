//! MCP Server for Obsidian vaults
//!
//! Provides fuzzy note search and retrieval to MCP clients over stdio.

mod server;
#[cfg(feature = "watch")]
mod watch;

pub use server::{run_mcp_server, VaultService};
