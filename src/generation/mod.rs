//! Text generation clients
//!
//! The persona layer only needs `complete(system, user)`; the concrete
//! client speaks the OpenAI-compatible chat completions API over `ureq`.

pub mod openai;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),
}

/// Per-request generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Anything that can turn a system prompt and a user message into a reply
pub trait GenerationClient {
    fn complete(&self, system: &str, user: &str, options: &GenerationOptions) -> Result<String, GenerationError>;
}
