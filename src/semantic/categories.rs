//! Semantic categories and their trigger keywords

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A named axis of relevance for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticCategory {
    Practice,
    Philosophy,
    PersonalGuidance,
    Tradition,
    Compassion,
    Directness,
    SpiritualExperience,
    ReligiousUnity,
}

impl SemanticCategory {
    pub const ALL: [SemanticCategory; 8] = [
        SemanticCategory::Practice,
        SemanticCategory::Philosophy,
        SemanticCategory::PersonalGuidance,
        SemanticCategory::Tradition,
        SemanticCategory::Compassion,
        SemanticCategory::Directness,
        SemanticCategory::SpiritualExperience,
        SemanticCategory::ReligiousUnity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticCategory::Practice => "practice",
            SemanticCategory::Philosophy => "philosophy",
            SemanticCategory::PersonalGuidance => "personal_guidance",
            SemanticCategory::Tradition => "tradition",
            SemanticCategory::Compassion => "compassion",
            SemanticCategory::Directness => "directness",
            SemanticCategory::SpiritualExperience => "spiritual_experience",
            SemanticCategory::ReligiousUnity => "religious_unity",
        }
    }
}

impl std::fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SemanticCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        SemanticCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

const PRACTICE: &[&str] = &[
    "practice",
    "method",
    "technique",
    "meditation",
    "inquiry",
    "how to",
    "steps",
    "worship",
    "devotion",
];

const PHILOSOPHY: &[&str] = &[
    "philosophy",
    "theory",
    "understanding",
    "concept",
    "what is",
    "meaning",
    "teach",
    "view",
    "belief",
];

const PERSONAL_GUIDANCE: &[&str] = &[
    "help",
    "struggle",
    "difficulty",
    "problem",
    "advice",
    "support",
    "confused",
    "lost",
    "should",
];

const TRADITION: &[&str] = &[
    "tradition", "lineage", "school", "approach", "method", "religion", "faith", "path",
];

const COMPASSION: &[&str] = &[
    "compassion",
    "kindness",
    "gentle",
    "care",
    "support",
    "struggle",
    "help",
    "confused",
];

const DIRECTNESS: &[&str] = &["direct", "immediate", "now", "clear", "straightforward", "simple", "give me"];

const SPIRITUAL_EXPERIENCE: &[&str] = &[
    "experience",
    "ecstasy",
    "divine",
    "god",
    "spiritual",
    "realization",
    "enlightenment",
];

const RELIGIOUS_UNITY: &[&str] = &["religion", "religions", "unity", "different", "faiths", "paths", "traditions"];

/// Trigger keywords for one category
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: SemanticCategory,
    pub keywords: Vec<String>,
}

/// Ordered, immutable category → keyword table
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

static BUILTIN: Lazy<CategoryTable> = Lazy::new(|| {
    CategoryTable::new(vec![
        (SemanticCategory::Practice, PRACTICE),
        (SemanticCategory::Philosophy, PHILOSOPHY),
        (SemanticCategory::PersonalGuidance, PERSONAL_GUIDANCE),
        (SemanticCategory::Tradition, TRADITION),
        (SemanticCategory::Compassion, COMPASSION),
        (SemanticCategory::Directness, DIRECTNESS),
        (SemanticCategory::SpiritualExperience, SPIRITUAL_EXPERIENCE),
        (SemanticCategory::ReligiousUnity, RELIGIOUS_UNITY),
    ])
});

impl CategoryTable {
    /// Build a table; keywords are lower-cased and de-duplicated per category
    pub fn new(entries: Vec<(SemanticCategory, &[&str])>) -> Self {
        let rules = entries
            .into_iter()
            .map(|(category, words)| {
                let mut keywords: Vec<String> = Vec::with_capacity(words.len());
                for word in words {
                    let word = word.to_lowercase();
                    if !word.is_empty() && !keywords.contains(&word) {
                        keywords.push(word);
                    }
                }
                CategoryRule { category, keywords }
            })
            .collect();

        Self { rules }
    }

    /// The process-wide table shared by every persona and question
    pub fn builtin() -> &'static CategoryTable {
        &BUILTIN
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Keywords for a category (empty if the table has no rule for it)
    pub fn keywords(&self, category: SemanticCategory) -> &[String] {
        self.rules
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.keywords.as_slice())
            .unwrap_or(&[])
    }
}
