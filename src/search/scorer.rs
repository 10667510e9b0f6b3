//! Similarity scoring between a query and one field value
//!
//! The score blends two signals:
//! - normalized edit distance, `1 - lev(q, f) / max(|q|, |f|)`, which tolerates typos
//! - token overlap, the share of query tokens contained in the field, which
//!   tolerates reordered or partial words
//!
//! Both work on case-folded text and lengths are counted in chars.

use crate::config::MatchingConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    edit_weight: f32,
    token_weight: f32,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(0.6, 0.4)
    }
}

impl Scorer {
    /// Weights are normalized to sum to 1 so scores stay within [0, 1]
    pub fn new(edit_weight: f32, token_weight: f32) -> Self {
        let total = edit_weight + token_weight;
        if !edit_weight.is_finite() || !token_weight.is_finite() || total <= 0.0 {
            return Self {
                edit_weight: 1.0,
                token_weight: 0.0,
            };
        }
        Self {
            edit_weight: edit_weight / total,
            token_weight: token_weight / total,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.edit_weight, config.token_weight)
    }

    /// Score `field` against `query`, in [0, 1]
    pub fn score(&self, query: &str, field: &str) -> f32 {
        let query = normalize(query);
        let field = normalize(field);
        if query.is_empty() || field.is_empty() {
            return 0.0;
        }

        let score = self.edit_weight * edit_similarity(&query, &field)
            + self.token_weight * token_overlap(&query, &field);
        let score = score.clamp(0.0, 1.0);
        debug_assert!(score.is_finite(), "non-finite score for {:?}", query);
        score
    }
}

/// Case-fold and collapse runs of whitespace
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1 - distance / max_len`; both inputs must be non-empty
fn edit_similarity(a: &str, b: &str) -> f32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    debug_assert!(max_len > 0);

    let distance = levenshtein(&a_chars, &b_chars);
    1.0 - distance as f32 / max_len as f32
}

/// Share of query tokens contained in the field
fn token_overlap(query: &str, field: &str) -> f32 {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let present = tokens.iter().filter(|t| field.contains(*t)).count();
    present as f32 / tokens.len() as f32
}

/// Levenshtein distance over chars, two-row variant
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    let m = a.len();
    let n = b.len();
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lev(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        levenshtein(&a, &b)
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(lev("", "abc"), 3);
        assert_eq!(lev("abc", ""), 3);
        assert_eq!(lev("kitten", "sitting"), 3);
        assert_eq!(lev("projct", "project"), 1);
        assert_eq!(lev("日本語", "日本"), 1);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let scorer = Scorer::default();
        assert_eq!(scorer.score("", "Project Plan"), 0.0);
        assert_eq!(scorer.score("   ", "Project Plan"), 0.0);
        assert_eq!(scorer.score("plan", ""), 0.0);
    }

    #[test]
    fn test_exact_match_scores_one() {
        let scorer = Scorer::default();
        assert!((scorer.score("Project Plan", "project plan") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_typo_example() {
        let scorer = Scorer::default();
        // lev = 1 over 12 chars, 1 of 2 tokens present
        let expected = 0.6 * (1.0 - 1.0 / 12.0) + 0.4 * 0.5;
        let got = scorer.score("projct plan", "Project Plan");
        assert!((got - expected).abs() < 1e-6, "got {}", got);
    }

    #[test]
    fn test_token_overlap_handles_reordering() {
        let scorer = Scorer::default();
        let reordered = scorer.score("plan project", "Project Plan");
        let unrelated = scorer.score("grocery list", "Project Plan");
        assert!(reordered > unrelated);
        assert!(reordered >= 0.4);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let scorer = Scorer::new(3.0, 1.0);
        for (q, f) in [
            ("a", "completely different"),
            ("long query with many words", "x"),
            ("same", "same"),
        ] {
            let s = scorer.score(q, f);
            assert!((0.0..=1.0).contains(&s), "{} for {:?}/{:?}", s, q, f);
        }
    }

    #[test]
    fn test_weights_are_normalized() {
        let a = Scorer::new(0.6, 0.4);
        let b = Scorer::new(6.0, 4.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_weights_keep_scores_finite() {
        for scorer in [
            Scorer::new(f32::INFINITY, 0.4),
            Scorer::new(f32::NAN, 0.4),
            Scorer::new(0.6, f32::NEG_INFINITY),
        ] {
            let score = scorer.score("project plan", "Project Plan");
            assert!(score.is_finite());
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_deterministic() {
        let scorer = Scorer::default();
        let first = scorer.score("meeting notes", "Weekly Meeting Notes 2024");
        let second = scorer.score("meeting notes", "Weekly Meeting Notes 2024");
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
