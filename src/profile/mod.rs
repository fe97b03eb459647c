//! Persona profiles
//!
//! A profile is the structured record a persona is built from:
//! identity, core teaching, traditions, claims, practices and care notes.
//! Every field except `id` and `canonical_name` is optional in the JSON
//! source and defaults to empty. An explicit `null` counts as absent.

pub mod repository;

use serde::{Deserialize, Deserializer, Serialize};

/// A persona's complete knowledge record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Stable identifier (e.g., "ramana-maharshi")
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    /// Display name
    #[serde(deserialize_with = "null_as_default")]
    pub canonical_name: String,

    /// Phonetic hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,

    /// One-paragraph summary of the core teaching
    #[serde(deserialize_with = "null_as_default")]
    pub thesis: String,

    #[serde(deserialize_with = "null_as_default")]
    pub affiliations: Affiliations,

    /// Discrete philosophical assertions
    #[serde(deserialize_with = "null_as_default")]
    pub claims: Vec<Claim>,

    /// Named procedures
    #[serde(deserialize_with = "null_as_default")]
    pub practice: Vec<Practice>,

    /// Salient concepts
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    /// Alternate names used for search
    #[serde(deserialize_with = "null_as_default")]
    pub alt_names: Vec<String>,

    /// Guidance for sensitive topics
    #[serde(deserialize_with = "null_as_default")]
    pub care_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Affiliations {
    #[serde(deserialize_with = "null_as_default")]
    pub traditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claim {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Practice {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<String>,
}

/// Treat `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Profile {
    /// Display name, if one is present
    pub fn name(&self) -> Option<&str> {
        let name = self.canonical_name.trim();
        if name.is_empty() { None } else { Some(name) }
    }

    /// Pronunciation hint, ignoring blank values
    pub fn pronunciation(&self) -> Option<&str> {
        self.pronunciation.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Traditions joined for display
    pub fn traditions(&self) -> String {
        self.affiliations.traditions.join(", ")
    }

    /// Case-insensitive substring match against name, alt names and keywords.
    /// `query` must already be lower-cased.
    pub fn matches(&self, query: &str) -> bool {
        self.canonical_name.to_lowercase().contains(query)
            || self.alt_names.iter().any(|n| n.to_lowercase().contains(query))
            || self.keywords.iter().any(|k| k.to_lowercase().contains(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserialize_full() {
        let json = r#"{
            "id": "ramana-maharshi",
            "canonical_name": "Ramana Maharshi",
            "pronunciation": "RAH-mah-nah mah-HAR-shee",
            "thesis": "Self-inquiry reveals the Self.",
            "affiliations": { "traditions": ["Advaita Vedanta"] },
            "claims": [{ "text": "The Self alone is real." }],
            "practice": [{ "name": "Self-Inquiry", "steps": ["Ask 'Who am I?'"] }],
            "keywords": ["self-inquiry", "Self"],
            "alt_names": ["Bhagavan"],
            "care_notes": ["Do not replace medical care."]
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.id, "ramana-maharshi");
        assert_eq!(profile.name(), Some("Ramana Maharshi"));
        assert_eq!(profile.traditions(), "Advaita Vedanta");
        assert_eq!(profile.claims[0].text, "The Self alone is real.");
        assert_eq!(profile.practice[0].steps.len(), 1);
        assert_eq!(profile.alt_names, vec!["Bhagavan"]);
    }

    #[test]
    fn test_profile_deserialize_minimal() {
        let profile: Profile = serde_json::from_str(r#"{"id": "x", "canonical_name": "X"}"#).unwrap();

        assert!(profile.pronunciation().is_none());
        assert!(profile.thesis.is_empty());
        assert!(profile.affiliations.traditions.is_empty());
        assert!(profile.practice.is_empty());
        assert!(profile.care_notes.is_empty());
    }

    #[test]
    fn test_profile_ignores_unknown_fields() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": "x", "canonical_name": "X", "lineage": {"guru": "Y"}}"#).unwrap();
        assert_eq!(profile.name(), Some("X"));
    }

    #[test]
    fn test_profile_null_fields_default() {
        let json = r#"{
            "id": "x",
            "canonical_name": "X",
            "pronunciation": null,
            "thesis": null,
            "affiliations": null,
            "claims": [{ "text": null }],
            "practice": [{ "name": "Sitting", "steps": null }],
            "keywords": null,
            "alt_names": null,
            "care_notes": null
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.name(), Some("X"));
        assert!(profile.pronunciation().is_none());
        assert!(profile.thesis.is_empty());
        assert!(profile.affiliations.traditions.is_empty());
        assert!(profile.claims[0].text.is_empty());
        assert!(profile.practice[0].steps.is_empty());
        assert!(profile.keywords.is_empty());
        assert!(profile.care_notes.is_empty());
    }

    #[test]
    fn test_profile_null_traditions_default() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": "x", "canonical_name": "X", "affiliations": {"traditions": null}}"#)
                .unwrap();
        assert_eq!(profile.traditions(), "");
    }

    #[test]
    fn test_profile_null_name_is_missing() {
        let profile: Profile = serde_json::from_str(r#"{"id": "x", "canonical_name": null}"#).unwrap();
        assert!(profile.name().is_none());
    }

    #[test]
    fn test_blank_name_is_missing() {
        let profile = Profile {
            canonical_name: "   ".to_string(),
            ..Default::default()
        };
        assert!(profile.name().is_none());
    }

    #[test]
    fn test_matches() {
        let profile = Profile {
            canonical_name: "Ramana Maharshi".to_string(),
            alt_names: vec!["Bhagavan".to_string()],
            keywords: vec!["Nonduality".to_string()],
            ..Default::default()
        };

        assert!(profile.matches("ramana"));
        assert!(profile.matches("bhaga"));
        assert!(profile.matches("nondual"));
        assert!(!profile.matches("zen"));
    }
}
