//! Fuzzy note resolution
//!
//! - `index`: shared in-memory map of note records
//! - `scorer`: edit-distance + token-overlap similarity for one field
//! - `ranker`: per-note field scoring, threshold, ordering, truncation
//! - `engine`: the resolver the CLI and MCP server talk to

pub mod engine;
pub mod index;
pub mod ranker;
pub mod record;
pub mod scorer;

pub use engine::{IndexStats, IndexingStats, NoteResolver, Resolution};
pub use index::NoteIndex;
pub use ranker::{Ranker, SearchOptions};
pub use record::{MatchCandidate, MatchedField, NoteRecord};
pub use scorer::Scorer;
