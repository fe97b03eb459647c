//! Semantic classification of questions
//!
//! A question is scored against every category in a [`CategoryTable`]:
//! the score is the number of distinct trigger keywords found as substrings
//! of the lower-cased question. Categories are independent and may share
//! keywords, so scores are neither normalized nor exclusive.

pub mod categories;

use serde::Serialize;
use std::collections::BTreeMap;

pub use categories::{CategoryTable, SemanticCategory};

/// Per-question category scores; every category is present, default 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreVector {
    scores: BTreeMap<SemanticCategory, usize>,
}

impl Default for ScoreVector {
    fn default() -> Self {
        Self {
            scores: SemanticCategory::ALL.into_iter().map(|c| (c, 0)).collect(),
        }
    }
}

impl ScoreVector {
    pub fn get(&self, category: SemanticCategory) -> usize {
        self.scores.get(&category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: SemanticCategory, score: usize) {
        self.scores.insert(category, score);
    }

    /// True if the category scored at all
    pub fn triggered(&self, category: SemanticCategory) -> bool {
        self.get(category) > 0
    }

    pub fn is_zero(&self) -> bool {
        self.scores.values().all(|&s| s == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SemanticCategory, usize)> + '_ {
        self.scores.iter().map(|(&c, &s)| (c, s))
    }
}

impl std::fmt::Display for ScoreVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(c, s)| format!("{}={}", c, s)).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Score a question against every category in the table
pub fn classify(question: &str, table: &CategoryTable) -> ScoreVector {
    let folded = question.to_lowercase();
    let mut scores = ScoreVector::default();

    for rule in table.rules() {
        scores.set(rule.category, count_matches(&folded, &rule.keywords));
    }

    scores
}

/// Count how many keywords occur in the content; repeats count once
fn count_matches(content: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|kw| content.contains(kw.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(question: &str) -> ScoreVector {
        classify(question, CategoryTable::builtin())
    }

    #[test]
    fn test_every_category_present() {
        let s = scores("How do I practice devotional worship?");
        assert_eq!(s.iter().count(), SemanticCategory::ALL.len());
    }

    #[test]
    fn test_empty_question_scores_zero() {
        assert!(scores("").is_zero());
        assert!(scores("   \n\t").is_zero());
    }

    #[test]
    fn test_unrelated_question_scores_zero() {
        assert!(scores("Hello there").is_zero());
    }

    #[test]
    fn test_practice_question() {
        let s = scores("How do I practice devotional worship?");
        // practice, worship, devotion
        assert_eq!(s.get(SemanticCategory::Practice), 3);
        assert_eq!(s.get(SemanticCategory::Philosophy), 0);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(scores("WHAT IS MEDITATION").get(SemanticCategory::Practice), 1);
        assert_eq!(scores("WHAT IS MEDITATION").get(SemanticCategory::Philosophy), 1);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let s = scores("help help help");
        assert_eq!(s.get(SemanticCategory::PersonalGuidance), 1);
        assert_eq!(s.get(SemanticCategory::Compassion), 1);
    }

    #[test]
    fn test_overlapping_categories() {
        let s = scores("I need help, give me a direct answer");
        assert!(s.triggered(SemanticCategory::PersonalGuidance));
        assert!(s.triggered(SemanticCategory::Compassion));
        // direct, give me
        assert_eq!(s.get(SemanticCategory::Directness), 2);
    }

    #[test]
    fn test_religious_unity() {
        let s = scores("What did you teach about different religions?");
        // religion, religions, different
        assert_eq!(s.get(SemanticCategory::ReligiousUnity), 3);
        assert_eq!(s.get(SemanticCategory::Tradition), 1);
        assert!(s.triggered(SemanticCategory::Philosophy));
    }

    #[test]
    fn test_deterministic() {
        let q = "I'm confused about which spiritual path to follow, can you help?";
        assert_eq!(scores(q), scores(q));
    }

    #[test]
    fn test_custom_table() {
        let table = CategoryTable::new(vec![(SemanticCategory::Directness, &["now"][..])]);
        let s = classify("right now", &table);
        assert_eq!(s.get(SemanticCategory::Directness), 1);
        assert_eq!(s.get(SemanticCategory::Practice), 0);
    }

    #[test]
    fn test_serializes_as_map() {
        let json = serde_json::to_value(scores("meditation")).unwrap();
        assert_eq!(json["practice"], 1);
        assert_eq!(json["religious_unity"], 0);
    }
}
