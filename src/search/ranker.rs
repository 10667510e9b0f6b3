//! Ranking of scored candidates

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::record::{MatchCandidate, MatchedField, NoteRecord};
use super::scorer::Scorer;
use crate::config::MatchingConfig;

/// Per-query overrides of the ranker defaults
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Only notes carrying at least one of these tags; empty means all notes
    pub scope: BTreeSet<String>,
    pub max_results: Option<usize>,
    pub min_score: Option<f32>,
}

impl SearchOptions {
    pub fn with_scope<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranker {
    scorer: Scorer,
    min_score: f32,
    max_results: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl Ranker {
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            scorer: Scorer::from_config(config),
            min_score: config.min_score,
            max_results: config.max_results,
        }
    }

    /// Score a single record: best of title, tags and excerpt.
    ///
    /// On equal scores the earlier field wins (title, then tags, then content).
    pub fn score_record(&self, query: &str, record: &NoteRecord) -> (f32, MatchedField) {
        let fields = [
            (MatchedField::Title, self.scorer.score(query, &record.title)),
            (MatchedField::Tags, self.scorer.score(query, &record.joined_tags())),
            (
                MatchedField::Content,
                self.scorer.score(query, &record.content_excerpt),
            ),
        ];

        fields
            .into_iter()
            .fold((0.0, MatchedField::Title), |best, (field, score)| {
                if score > best.0 {
                    (score, field)
                } else {
                    best
                }
            })
    }

    /// Score, filter, sort and truncate `records` for `query`
    pub fn rank<I>(&self, query: &str, records: I, options: &SearchOptions) -> Vec<MatchCandidate>
    where
        I: IntoIterator<Item = Arc<NoteRecord>>,
    {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let min_score = options
            .min_score
            .filter(|s| s.is_finite())
            .unwrap_or(self.min_score)
            .clamp(0.0, 1.0);
        let max_results = options.max_results.unwrap_or(self.max_results);

        let mut candidates: Vec<MatchCandidate> = records
            .into_iter()
            .filter(|record| record.in_scope(&options.scope))
            .filter_map(|record| {
                let (score, matched_field) = self.score_record(query, &record);
                (score >= min_score).then(|| MatchCandidate {
                    note: record,
                    score,
                    matched_field,
                })
            })
            .collect();

        candidates.sort_by(compare_candidates);
        candidates.truncate(max_results);
        candidates
    }
}

/// Score descending, then shorter title, then path
fn compare_candidates(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            a.note
                .title
                .chars()
                .count()
                .cmp(&b.note.title.chars().count())
        })
        .then_with(|| a.note.path.cmp(&b.note.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(items: &[(&str, &str)]) -> Vec<Arc<NoteRecord>> {
        items
            .iter()
            .map(|(path, title)| Arc::new(NoteRecord::new(*path, *title)))
            .collect()
    }

    #[test]
    fn test_typo_ranks_closer_title_first() {
        let ranker = Ranker::default();
        let notes = records(&[("b.md", "Project Planning Notes"), ("a.md", "Project Plan")]);

        let results = ranker.rank("projct plan", notes, &SearchOptions::default());

        let paths: Vec<&str> = results.iter().map(|c| c.note.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b.md"]);
        assert!(results.iter().all(|c| c.matched_field == MatchedField::Title));
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let ranker = Ranker::default();
        let notes = records(&[("a.md", "Anything")]);
        assert!(ranker.rank("", notes.clone(), &SearchOptions::default()).is_empty());
        assert!(ranker.rank("  \t", notes, &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_results_sorted_and_above_threshold() {
        let ranker = Ranker::default();
        let notes = records(&[
            ("1.md", "Rust Ownership"),
            ("2.md", "Rust Borrowing Rules"),
            ("3.md", "Gardening"),
            ("4.md", "Rusty Bike Repair"),
            ("5.md", "rust"),
        ]);

        let results = ranker.rank("rust", notes, &SearchOptions::default());

        assert!(!results.is_empty());
        assert!(results.iter().all(|c| c.score >= 0.3));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(results[0].note.path, "5.md");
    }

    #[test]
    fn test_ties_break_on_title_length_then_path() {
        let ranker = Ranker::default();
        let notes: Vec<Arc<NoteRecord>> = vec![
            Arc::new(NoteRecord::new("z.md", "Alpha").with_tags(["alpha"])),
            Arc::new(NoteRecord::new("y.md", "Beta Gamma").with_tags(["alpha"])),
            Arc::new(NoteRecord::new("x.md", "Delta").with_tags(["alpha"])),
        ];

        let results = ranker.rank(
            "alpha",
            notes,
            &SearchOptions::default().with_min_score(0.0),
        );

        // All three score 1.0 (title or tags); shorter titles first, then path
        let paths: Vec<&str> = results.iter().map(|c| c.note.path.as_str()).collect();
        assert_eq!(paths, vec!["x.md", "z.md", "y.md"]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let ranker = Ranker::default();
        let notes: Vec<Arc<NoteRecord>> = (0..20)
            .map(|i| Arc::new(NoteRecord::new(format!("{:02}.md", i), format!("daily log {}", i))))
            .collect();

        assert_eq!(ranker.rank("daily log", notes.clone(), &SearchOptions::default()).len(), 10);
        assert_eq!(
            ranker
                .rank("daily log", notes, &SearchOptions::default().with_max_results(3))
                .len(),
            3
        );
    }

    #[test]
    fn test_matched_field_content() {
        let ranker = Ranker::default();
        let notes = vec![Arc::new(
            NoteRecord::new("n.md", "Untitled").with_excerpt("kubernetes deployment checklist"),
        )];

        let results = ranker.rank("deployment checklist", notes, &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched_field, MatchedField::Content);
    }

    #[test]
    fn test_scope_filters_by_tag() {
        let ranker = Ranker::default();
        let notes = vec![
            Arc::new(NoteRecord::new("a.md", "Meeting").with_tags(["work"])),
            Arc::new(NoteRecord::new("b.md", "Meeting").with_tags(["home"])),
        ];

        let results = ranker.rank(
            "meeting",
            notes,
            &SearchOptions::default().with_scope(["WORK"]),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].note.path, "a.md");
    }

    #[test]
    fn test_non_finite_min_score_falls_back_to_default() {
        let ranker = Ranker::default();
        let notes = records(&[("a.md", "Project Plan"), ("b.md", "Gardening")]);

        for min_score in [f32::NAN, f32::INFINITY] {
            let results = ranker.rank(
                "project plan",
                notes.clone(),
                &SearchOptions::default().with_min_score(min_score),
            );
            let paths: Vec<&str> = results.iter().map(|c| c.note.path.as_str()).collect();
            assert_eq!(paths, vec!["a.md"]);
        }
    }

    #[test]
    fn test_deterministic_ordering() {
        let ranker = Ranker::default();
        let notes = records(&[
            ("c.md", "Plan"),
            ("a.md", "Plan"),
            ("b.md", "Plans"),
            ("d.md", "Planet"),
        ]);

        let first = ranker.rank("plan", notes.clone(), &SearchOptions::default());
        let mut reversed = notes;
        reversed.reverse();
        let second = ranker.rank("plan", reversed, &SearchOptions::default());

        assert_eq!(first, second);
        assert_eq!(first[0].note.path, "a.md");
        assert_eq!(first[1].note.path, "c.md");
    }
}
