//! vaultmatch library
//!
//! Obsidian vault access for MCP clients, built around fuzzy note resolution.
//!
//! # Modules
//!
//! - `core`: Vault file layer (notes, front-matter, paths)
//! - `search`: Note index, similarity scoring and ranking
//! - `config`: `.vaultmatch.yaml` settings
//! - `mcp`: MCP server exposing the tools over stdio

pub mod config;
pub mod core;
pub mod error;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod search;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::frontmatter::Frontmatter;
pub use crate::core::note::{collect_all_notes, Note};
pub use crate::core::paths::VaultPaths;
pub use error::{Error, Result};
pub use search::{MatchCandidate, MatchedField, NoteRecord, NoteResolver, SearchOptions};
