//! Focused system prompt assembly
//!
//! The prompt is built in a fixed order: identity header, the conditional
//! content sections, one tone directive, an optional focus line and the
//! closing directive. Which sections appear is decided by the question's
//! [`ScoreVector`] through the [`SECTIONS`] and [`TONE_RULES`] tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::Profile;
use crate::semantic::{ScoreVector, SemanticCategory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// The identity header cannot be written without a name
    #[error("Profile '{id}' has no canonical_name")]
    MissingIdentity { id: String },
}

/// Conditional content section
struct Section {
    trigger: SemanticCategory,
    render: fn(&Profile) -> Option<String>,
}

/// Content sections in emission order
const SECTIONS: &[Section] = &[
    Section {
        trigger: SemanticCategory::Practice,
        render: render_practice,
    },
    Section {
        trigger: SemanticCategory::Philosophy,
        render: render_philosophy,
    },
    Section {
        trigger: SemanticCategory::PersonalGuidance,
        render: render_guidance,
    },
    Section {
        trigger: SemanticCategory::SpiritualExperience,
        render: render_spiritual_experience,
    },
    Section {
        trigger: SemanticCategory::ReligiousUnity,
        render: render_religious_unity,
    },
];

/// Response tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Gentle,
    Direct,
    Balanced,
}

impl Tone {
    pub fn directive(&self) -> &'static str {
        match self {
            Tone::Gentle => "Gentle, compassionate, supportive",
            Tone::Direct => "Direct, clear, immediate",
            Tone::Balanced => "Balanced, authentic to your teaching style",
        }
    }
}

/// First matching rule wins; no match means [`Tone::Balanced`]
const TONE_RULES: &[(SemanticCategory, Tone)] = &[
    (SemanticCategory::Compassion, Tone::Gentle),
    (SemanticCategory::Directness, Tone::Direct),
];

/// Pick the tone for a set of scores
pub fn select_tone(scores: &ScoreVector) -> Tone {
    TONE_RULES
        .iter()
        .find(|(category, _)| scores.triggered(*category))
        .map(|(_, tone)| *tone)
        .unwrap_or(Tone::Balanced)
}

/// Profile keywords that literally occur in the question, in profile order
pub fn focus_keywords<'a>(profile: &'a Profile, question: &str) -> Vec<&'a str> {
    let folded = question.to_lowercase();
    let mut seen: Vec<String> = Vec::new();
    let mut focus = Vec::new();

    for keyword in &profile.keywords {
        if keyword.trim().is_empty() {
            continue;
        }
        // Surrounding whitespace is part of the keyword and must match too
        let lower = keyword.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        if folded.contains(&lower) {
            focus.push(keyword.as_str());
            seen.push(lower);
        }
    }

    focus
}

/// The assembled system prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledPrompt {
    pub text: String,
    pub tone: Tone,
    /// Categories whose section was rendered
    pub sections: Vec<SemanticCategory>,
    pub focus: Vec<String>,
}

impl AssembledPrompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for AssembledPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Assemble a focused system prompt for one question
pub fn assemble(profile: &Profile, question: &str, scores: &ScoreVector) -> Result<AssembledPrompt, PromptError> {
    let name = profile.name().ok_or_else(|| PromptError::MissingIdentity {
        id: profile.id.clone(),
    })?;

    let mut text = identity_header(profile, name);
    let mut sections = Vec::new();

    for section in SECTIONS {
        if !scores.triggered(section.trigger) {
            continue;
        }
        if let Some(block) = (section.render)(profile) {
            text.push('\n');
            text.push_str(&block);
            sections.push(section.trigger);
        }
    }

    let tone = select_tone(scores);
    text.push_str(&format!("\nTONE: {}", tone.directive()));

    let focus = focus_keywords(profile, question);
    if !focus.is_empty() {
        text.push_str(&format!("\nFOCUS ON: {}", focus.join(", ")));
    }

    text.push_str(&closing_directive(name));

    Ok(AssembledPrompt {
        text,
        tone,
        sections,
        focus: focus.into_iter().map(String::from).collect(),
    })
}

fn identity_header(profile: &Profile, name: &str) -> String {
    let identity = match profile.pronunciation() {
        Some(p) => format!("You are {} ({}).", name, p),
        None => format!("You are {}.", name),
    };

    format!(
        "{}\n\nCORE TEACHING: {}\n\nTRADITION: {}\n",
        identity,
        profile.thesis.trim(),
        profile.traditions()
    )
}

fn render_practice(profile: &Profile) -> Option<String> {
    if profile.practice.is_empty() {
        return None;
    }

    let mut block = String::from("FOCUS ON PRACTICAL METHODS:\n");
    for practice in &profile.practice {
        block.push_str(&format!("\nPRACTICE - {}:\n", practice.name));
        for step in &practice.steps {
            block.push_str(&format!("- {}\n", step));
        }
    }
    Some(block)
}

fn render_philosophy(profile: &Profile) -> Option<String> {
    if profile.claims.is_empty() {
        return None;
    }

    let mut block = String::from("CORE PHILOSOPHICAL INSIGHTS:\n");
    for claim in &profile.claims {
        block.push_str(&format!("- {}\n", claim.text));
    }
    Some(block)
}

fn render_guidance(profile: &Profile) -> Option<String> {
    let mut block = String::from("GUIDANCE APPROACH:\n");
    if !profile.care_notes.is_empty() {
        block.push_str(&format!("Remember: {}\n", profile.care_notes.join(", ")));
    }
    block.push_str("Respond with extra compassion and practical support.\n");
    Some(block)
}

fn render_spiritual_experience(_: &Profile) -> Option<String> {
    Some(
        "SPIRITUAL EXPERIENCE GUIDANCE:\n\
         Emphasize direct experience over intellectual understanding.\n\
         Focus on practical steps toward spiritual realization.\n"
            .to_string(),
    )
}

fn render_religious_unity(_: &Profile) -> Option<String> {
    Some(
        "RELIGIOUS UNITY PERSPECTIVE:\n\
         Emphasize your teachings on the unity of all faiths.\n\
         Highlight how different paths lead to the same divine reality.\n"
            .to_string(),
    )
}

fn closing_directive(name: &str) -> String {
    format!(
        "\n\nRESPOND AS {}:\n\
         - Use your authentic voice and teaching style\n\
         - Draw from your core insights and methods\n\
         - Stay true to your tradition and approach\n\
         - FOCUS YOUR RESPONSE on the aspects most relevant to this question\n\
         - If asked about something outside your expertise, acknowledge it honestly\n\
         \n\
         Remember: You are speaking from your lived experience and understanding.",
        name
    )
}
