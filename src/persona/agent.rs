//! Persona agent: a profile bound to a generation client

use crate::generation::{GenerationClient, GenerationError, GenerationOptions};
use crate::profile::Profile;
use crate::semantic::{CategoryTable, classify};

use super::prompt::{AssembledPrompt, PromptError, assemble};

/// Reply shown when generation fails
const FALLBACK_PREFIX: &str = "I apologize, but I'm experiencing some difficulty responding right now.";

/// Outcome of a single question
#[derive(Debug)]
pub enum Reply {
    /// Text produced by the generation client
    Answer(String),
    /// Generation failed; `text` is a user-facing apology
    Fallback { text: String, cause: GenerationError },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) => text,
            Reply::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Reply::Fallback { .. })
    }
}

/// Answers questions as a persona
pub struct PersonaAgent<'a, C: GenerationClient> {
    profile: &'a Profile,
    table: &'a CategoryTable,
    client: C,
    options: GenerationOptions,
}

impl<'a, C: GenerationClient> PersonaAgent<'a, C> {
    /// Bind a profile to a client; the profile must have a name
    pub fn new(
        profile: &'a Profile,
        table: &'a CategoryTable,
        client: C,
        options: GenerationOptions,
    ) -> Result<Self, PromptError> {
        if profile.name().is_none() {
            return Err(PromptError::MissingIdentity { id: profile.id.clone() });
        }

        Ok(Self {
            profile,
            table,
            client,
            options,
        })
    }

    pub fn name(&self) -> &str {
        self.profile.canonical_name.trim()
    }

    pub fn profile(&self) -> &Profile {
        self.profile
    }

    /// Build the focused system prompt for a question
    pub fn prompt_for(&self, question: &str) -> Result<AssembledPrompt, PromptError> {
        let scores = classify(question, self.table);
        log::debug!("Scores for {:?}: {}", question, scores);
        assemble(self.profile, question, &scores)
    }

    /// Answer a question; generation failures become a fallback reply
    pub fn respond(&self, question: &str) -> Result<Reply, PromptError> {
        let prompt = self.prompt_for(question)?;

        match self.client.complete(prompt.as_str(), question, &self.options) {
            Ok(text) => Ok(Reply::Answer(text)),
            Err(cause) => {
                log::error!("Generation failed for {}: {}", self.profile.id, cause);
                Ok(Reply::Fallback {
                    text: format!("{} Error: {}", FALLBACK_PREFIX, cause),
                    cause,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records what it was asked and answers from a fixed result
    struct StubClient {
        reply: Result<String, String>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl StubClient {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(cause: &str) -> Self {
            Self {
                reply: Err(cause.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerationClient for &StubClient {
        fn complete(&self, system: &str, user: &str, _options: &GenerationOptions) -> Result<String, GenerationError> {
            self.calls.borrow_mut().push((system.to_string(), user.to_string()));
            self.reply.clone().map_err(GenerationError::Request)
        }
    }

    fn profile() -> Profile {
        Profile {
            id: "anandamayi-ma".to_string(),
            canonical_name: "Anandamayi Ma".to_string(),
            thesis: "All is the Divine.".to_string(),
            keywords: vec!["devotion".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_respond_passes_prompt_verbatim() {
        let profile = profile();
        let stub = StubClient::ok("Sing the Name.");
        let agent = PersonaAgent::new(&profile, CategoryTable::builtin(), &stub, GenerationOptions::default()).unwrap();

        let question = "How do I grow in devotion?";
        let reply = agent.respond(question).unwrap();

        assert_eq!(reply.text(), "Sing the Name.");
        assert!(!reply.is_fallback());

        let calls = stub.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, agent.prompt_for(question).unwrap().text);
        assert_eq!(calls[0].1, question);
    }

    #[test]
    fn test_respond_degrades_on_failure() {
        let profile = profile();
        let stub = StubClient::failing("connection refused");
        let agent = PersonaAgent::new(&profile, CategoryTable::builtin(), &stub, GenerationOptions::default()).unwrap();

        let reply = agent.respond("Hello").unwrap();

        assert!(reply.is_fallback());
        assert!(reply.text().starts_with("I apologize"));
        assert!(reply.text().contains("connection refused"));
        assert_eq!(stub.calls.borrow().len(), 1);
    }

    #[test]
    fn test_new_requires_name() {
        let profile = Profile {
            id: "nameless".to_string(),
            ..Default::default()
        };
        let stub = StubClient::ok("unused");
        let result = PersonaAgent::new(&profile, CategoryTable::builtin(), &stub, GenerationOptions::default());

        assert!(matches!(result, Err(PromptError::MissingIdentity { .. })));
    }
}
