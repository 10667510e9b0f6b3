use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use glob::Pattern;
use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use super::frontmatter::Frontmatter;
use super::paths::VaultPaths;
use crate::error::{Error, Result};
use crate::search::record::NoteRecord;

lazy_static! {
    // #tag or #nested/tag; a leading letter or underscore keeps "#123" and headings out
    static ref INLINE_TAG_RE: Regex = Regex::new(r"(?:^|\s)#([\p{L}_][\w/-]*)").unwrap();
}

pub struct Note {
    pub path: PathBuf,
    /// Vault-relative path with forward slashes
    pub id: String,
    pub title: String,
    pub tags: BTreeSet<String>,
    pub aliases: Vec<String>,
    pub content: String,
    pub frontmatter: Option<Frontmatter>,
    pub modified: DateTime<Local>,
}

impl Note {
    pub fn load(paths: &VaultPaths, path: &Path) -> Result<Self> {
        let id = paths.relative(path).ok_or_else(|| {
            Error::InvalidRecord(format!("{} is outside the vault", path.display()))
        })?;
        let content = fs::read_to_string(path)?;
        let metadata = fs::metadata(path)?;

        let frontmatter = Frontmatter::parse(&content);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let title = frontmatter
            .as_ref()
            .and_then(|fm| fm.title.clone())
            .unwrap_or(stem);

        let body = &content[Frontmatter::body_offset(&content)..];
        let mut tags: BTreeSet<String> = extract_inline_tags(body).into_iter().collect();
        if let Some(fm) = &frontmatter {
            tags.extend(fm.tags.iter().cloned());
        }
        let aliases = frontmatter
            .as_ref()
            .map(|fm| fm.aliases.clone())
            .unwrap_or_default();

        let modified = DateTime::from(metadata.modified()?);

        Ok(Self {
            path: path.to_path_buf(),
            id,
            title,
            tags,
            aliases,
            content,
            frontmatter,
            modified,
        })
    }

    /// Note text after the front-matter block
    pub fn body(&self) -> &str {
        &self.content[Frontmatter::body_offset(&self.content)..]
    }

    /// Body with whitespace collapsed, cut to `max_chars` chars
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut excerpt = String::new();
        for (i, word) in self.body().split_whitespace().enumerate() {
            if i > 0 {
                excerpt.push(' ');
            }
            excerpt.push_str(word);
            if excerpt.chars().count() >= max_chars {
                break;
            }
        }
        match excerpt.char_indices().nth(max_chars) {
            Some((idx, _)) => excerpt[..idx].to_string(),
            None => excerpt,
        }
    }

    pub fn to_record(&self, excerpt_chars: usize) -> NoteRecord {
        NoteRecord::new(self.id.clone(), self.title.clone())
            .with_tags(self.tags.iter().cloned())
            .with_aliases(self.aliases.iter().cloned())
            .with_excerpt(self.excerpt(excerpt_chars))
    }
}

/// Inline `#tags` in a note body, lower-cased
pub fn extract_inline_tags(body: &str) -> Vec<String> {
    INLINE_TAG_RE
        .captures_iter(body)
        .map(|c| c[1].trim_end_matches('/').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Compile exclude globs from config
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Error::from))
        .collect()
}

/// True if `relative` is hidden or matches one of `exclude`
pub fn is_excluded(relative: &str, exclude: &[Pattern]) -> bool {
    let options = glob::MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    relative.split('/').any(|part| part.starts_with('.'))
        || exclude.iter().any(|p| p.matches_with(relative, options))
}

/// Load every markdown note under the vault root, sorted by id.
///
/// Unreadable notes are logged and skipped.
pub fn collect_all_notes(paths: &VaultPaths, exclude: &[Pattern]) -> Result<Vec<Note>> {
    collect_notes_under(paths, &paths.root, exclude)
}

/// Same as [`collect_all_notes`], limited to one directory inside the vault
pub fn collect_notes_under(paths: &VaultPaths, dir: &Path, exclude: &[Pattern]) -> Result<Vec<Note>> {
    let mut notes = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            paths
                .relative(e.path())
                .map_or(true, |rel| !is_excluded(&rel, exclude))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !VaultPaths::is_note(entry.path()) {
            continue;
        }
        match Note::load(paths, entry.path()) {
            Ok(note) => notes.push(note),
            Err(e) => tracing::warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    notes.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(notes)
}
