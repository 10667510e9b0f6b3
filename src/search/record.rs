//! Note records and match candidates

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Queryable representation of one vault note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRecord {
    /// Vault-relative path, the note's identity in the index
    pub path: String,
    pub title: String,
    /// Tags, kept sorted so the joined form is stable
    pub tags: BTreeSet<String>,
    pub content_excerpt: String,
    /// Alternative names, used for exact resolution only
    pub aliases: Vec<String>,
}

impl NoteRecord {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            tags: BTreeSet::new(),
            content_excerpt: String::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.content_excerpt = excerpt.into();
        self
    }

    /// Check the record at ingestion and fill in derivable fields.
    ///
    /// A blank path is rejected. A blank title falls back to the file stem.
    /// The excerpt is cut to `excerpt_chars` chars.
    pub fn validated(mut self, excerpt_chars: usize) -> Result<Self> {
        if self.path.trim().is_empty() {
            return Err(Error::InvalidRecord(format!(
                "missing path (title: {:?})",
                self.title
            )));
        }

        if self.title.trim().is_empty() {
            self.title = Path::new(&self.path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&self.path)
                .to_string();
        }

        self.tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().trim_start_matches('#').to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if let Some((idx, _)) = self.content_excerpt.char_indices().nth(excerpt_chars) {
            self.content_excerpt.truncate(idx);
        }

        Ok(self)
    }

    /// Tags joined with single spaces, in sorted order
    pub fn joined_tags(&self) -> String {
        self.tags.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }

    /// True if the note carries any of `scope` (case-insensitive)
    pub fn in_scope(&self, scope: &BTreeSet<String>) -> bool {
        if scope.is_empty() {
            return true;
        }
        let wanted: BTreeSet<String> = scope.iter().map(|s| s.to_lowercase()).collect();
        self.tags.iter().any(|t| wanted.contains(&t.to_lowercase()))
    }
}

/// Field that produced a candidate's dominant score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Title,
    Tags,
    Content,
}

impl fmt::Display for MatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Tags => write!(f, "tags"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// One ranked result of a query
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Shared with the index snapshot the query ran against
    pub note: Arc<NoteRecord>,
    pub score: f32,
    pub matched_field: MatchedField,
}
