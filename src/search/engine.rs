//! Note resolver - the entry point used by the CLI and MCP layers
//!
//! Owns the shared [`NoteIndex`] and the ranking config. The vault layer feeds
//! it through `index_note`/`deindex_note` (or a full `index_vault` scan) and
//! the tool layer queries it through `search`/`resolve`.

use chrono::{DateTime, Local};
use glob::Pattern;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::index::NoteIndex;
use super::ranker::{Ranker, SearchOptions};
use super::record::{MatchCandidate, MatchedField, NoteRecord};
use crate::config::Config;
use crate::core::note::{collect_all_notes, collect_notes_under, compile_excludes, is_excluded, Note};
use crate::core::paths::VaultPaths;
use crate::error::{Error, Result};

/// Outcome of a full vault scan
#[derive(Debug, Clone, Serialize)]
pub struct IndexingStats {
    pub indexed: usize,
    pub removed: usize,
    pub failed: usize,
    pub duration_ms: u128,
}

/// Snapshot of index contents
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub note_count: usize,
    pub tag_count: usize,
    pub last_indexed: Option<DateTime<Local>>,
}

/// How `resolve` found its note
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Path, title or alias matched exactly
    Exact(Arc<NoteRecord>),
    /// Best fuzzy candidate, with the runners-up
    Fuzzy {
        best: MatchCandidate,
        alternatives: Vec<MatchCandidate>,
    },
}

impl Resolution {
    pub fn note(&self) -> &Arc<NoteRecord> {
        match self {
            Self::Exact(note) => note,
            Self::Fuzzy { best, .. } => &best.note,
        }
    }

    pub fn score(&self) -> f32 {
        match self {
            Self::Exact(_) => 1.0,
            Self::Fuzzy { best, .. } => best.score,
        }
    }
}

pub struct NoteResolver {
    index: NoteIndex,
    ranker: Ranker,
    excerpt_chars: usize,
    vault_paths: VaultPaths,
    exclude: Vec<Pattern>,
    last_indexed: RwLock<Option<DateTime<Local>>>,
}

impl NoteResolver {
    pub fn new(vault_root: PathBuf, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            index: NoteIndex::new(),
            ranker: Ranker::from_config(&config.matching),
            excerpt_chars: config.matching.excerpt_chars,
            vault_paths: VaultPaths::from_root(vault_root),
            exclude: compile_excludes(&config.vault.exclude)?,
            last_indexed: RwLock::new(None),
        })
    }

    /// Resolver with no vault on disk, fed only through `index_note`
    pub fn in_memory(config: &Config) -> Result<Self> {
        Self::new(PathBuf::new(), config)
    }

    pub fn vault_paths(&self) -> &VaultPaths {
        &self.vault_paths
    }

    /// Validate and insert (or refresh) a record
    pub fn index_note(&self, record: NoteRecord) -> Result<()> {
        let record = record.validated(self.excerpt_chars)?;
        tracing::debug!("Indexed {}", record.path);
        self.index.upsert(record);
        Ok(())
    }

    pub fn deindex_note(&self, path: &str) {
        if self.index.remove(path) {
            tracing::debug!("Removed {}", path);
        }
    }

    /// Ranked candidates for `query` over a snapshot of the index
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<MatchCandidate> {
        if query.trim().is_empty() || self.index.is_empty() {
            return Vec::new();
        }
        self.ranker.rank(query, self.index.all_records(), options)
    }

    pub fn get(&self, path: &str) -> Option<Arc<NoteRecord>> {
        self.index.get(path)
    }

    /// Find the single note a user most likely means.
    ///
    /// Tries the exact path (with or without `.md`), then a case-insensitive
    /// title or alias, then the best fuzzy candidate.
    pub fn resolve(&self, query: &str) -> Result<Resolution> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::NoteNotFound(String::new()));
        }

        if let Some(note) = self
            .index
            .get(query)
            .or_else(|| self.index.get(&format!("{}.md", query)))
        {
            return Ok(Resolution::Exact(note));
        }

        let folded = query.to_lowercase();
        let mut exact: Vec<Arc<NoteRecord>> = self
            .index
            .all_records()
            .filter(|r| {
                r.title.to_lowercase() == folded
                    || r.aliases.iter().any(|a| a.to_lowercase() == folded)
            })
            .collect();
        exact.sort_by(|a, b| a.path.cmp(&b.path));
        if let Some(note) = exact.into_iter().next() {
            return Ok(Resolution::Exact(note));
        }

        let mut candidates = self
            .search(query, &SearchOptions::default().with_max_results(4))
            .into_iter();
        match candidates.next() {
            Some(best) => Ok(Resolution::Fuzzy {
                best,
                alternatives: candidates.collect(),
            }),
            None => Err(Error::NoteNotFound(query.to_string())),
        }
    }

    /// Records sorted by path, optionally limited to a tag
    pub fn list(&self, tag: Option<&str>, limit: usize) -> Vec<Arc<NoteRecord>> {
        let scope: BTreeSet<String> = tag.into_iter().map(str::to_string).collect();
        let mut records: Vec<Arc<NoteRecord>> = self
            .index
            .all_records()
            .filter(|r| r.in_scope(&scope))
            .collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        records.truncate(limit);
        records
    }

    /// Rescan the vault; records whose file is gone are dropped
    pub fn index_vault(&self) -> Result<IndexingStats> {
        let start = std::time::Instant::now();
        // Only records present before the walk are candidates for removal
        let before = self.index.paths();
        let notes = collect_all_notes(&self.vault_paths, &self.exclude)?;

        let mut seen = HashSet::new();
        let mut indexed = 0;
        let mut failed = 0;

        for note in &notes {
            seen.insert(note.id.clone());
            match self.index_note(note.to_record(self.excerpt_chars)) {
                Ok(()) => indexed += 1,
                Err(e) => {
                    tracing::warn!("Failed to index {}: {}", note.id, e);
                    failed += 1;
                }
            }
        }

        let removed = self.prune_unseen(before, &seen);

        *self.last_indexed.write() = Some(Local::now());
        let stats = IndexingStats {
            indexed,
            removed,
            failed,
            duration_ms: start.elapsed().as_millis(),
        };
        tracing::info!(
            "Indexed {} notes ({} removed, {} failed) in {}ms",
            stats.indexed,
            stats.removed,
            stats.failed,
            stats.duration_ms
        );
        Ok(stats)
    }

    /// Bring one path's records in line with the disk: load or drop a note,
    /// or every note under a directory. Returns whether any note under `path`
    /// is now indexed.
    pub fn reindex_path(&self, path: &Path) -> Result<bool> {
        let Some(id) = self.vault_paths.relative(path) else {
            return Ok(false);
        };
        if is_excluded(&id, &self.exclude) {
            return Ok(false);
        }

        if path.is_dir() {
            return self.reindex_dir(path, &id);
        }
        if path.is_file() {
            if !VaultPaths::is_note(path) {
                return Ok(false);
            }
            let note = Note::load(&self.vault_paths, path)?;
            self.index_note(note.to_record(self.excerpt_chars))?;
            return Ok(true);
        }

        // Gone from disk: a deleted note, or a folder renamed or moved away
        self.deindex_note(&id);
        self.deindex_under(&id);
        Ok(false)
    }

    /// Sync every note below `dir`, dropping records whose file is gone
    fn reindex_dir(&self, dir: &Path, id: &str) -> Result<bool> {
        let prefix = format!("{}/", id);
        let before: Vec<String> = self
            .index
            .paths()
            .into_iter()
            .filter(|p| p.starts_with(&prefix))
            .collect();
        let notes = collect_notes_under(&self.vault_paths, dir, &self.exclude)?;
        let seen: HashSet<String> = notes.iter().map(|n| n.id.clone()).collect();
        self.prune_unseen(before, &seen);

        let mut indexed = 0;
        for note in &notes {
            match self.index_note(note.to_record(self.excerpt_chars)) {
                Ok(()) => indexed += 1,
                Err(e) => tracing::warn!("Failed to index {}: {}", note.id, e),
            }
        }
        tracing::debug!("Reindexed {} notes under {}", indexed, id);
        Ok(indexed > 0)
    }

    /// Drop the `candidates` missing from `seen`; returns how many were removed
    fn prune_unseen(&self, candidates: Vec<String>, seen: &HashSet<String>) -> usize {
        let mut removed = 0;
        for path in candidates {
            if !seen.contains(&path) && self.index.remove(&path) {
                tracing::debug!("Removed {}", path);
                removed += 1;
            }
        }
        removed
    }

    fn deindex_under(&self, id: &str) {
        let prefix = format!("{}/", id);
        for path in self.index.paths() {
            if path.starts_with(&prefix) {
                self.deindex_note(&path);
            }
        }
    }

    pub fn stats(&self) -> IndexStats {
        let mut tags = BTreeSet::new();
        let mut note_count = 0;
        for record in self.index.all_records() {
            note_count += 1;
            tags.extend(record.tags.iter().cloned());
        }
        IndexStats {
            note_count,
            tag_count: tags.len(),
            last_indexed: *self.last_indexed.read(),
        }
    }
}

/// JSON shape of a candidate in tool and CLI output
#[derive(Debug, Clone, Serialize)]
pub struct CandidateJson {
    pub title: String,
    pub path: String,
    pub tags: Vec<String>,
    pub score: f32,
    pub matched_field: MatchedField,
}

impl From<&MatchCandidate> for CandidateJson {
    fn from(c: &MatchCandidate) -> Self {
        Self {
            title: c.note.title.clone(),
            path: c.note.path.clone(),
            tags: c.note.tags.iter().cloned().collect(),
            score: c.score,
            matched_field: c.matched_field,
        }
    }
}
