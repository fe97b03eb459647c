//! OpenAI-compatible chat completions client

use serde::{Deserialize, Serialize};

use super::{GenerationClient, GenerationError, GenerationOptions};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Longest raw body echoed back when the error isn't JSON
const MAX_ERROR_BODY: usize = 500;

/// Blocking client for `{api_base}/chat/completions`
pub struct OpenAiClient {
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_base: &str, api_key: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

fn request_body(system: &str, user: &str, options: &GenerationOptions) -> Result<String, GenerationError> {
    let request = ChatRequest {
        model: &options.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    };

    serde_json::to_string(&request).map_err(|e| GenerationError::Request(format!("Failed to serialize request: {}", e)))
}

fn parse_reply(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GenerationError::InvalidResponse("No message content in response".to_string()))
}

/// Turn a non-2xx reply into a `Request` error carrying the status and the
/// API's own `error.message` (or the raw body when it isn't the usual JSON).
fn api_error(status: u16, body: &str) -> GenerationError {
    let detail = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().chars().take(MAX_ERROR_BODY).collect(),
    };

    if detail.trim().is_empty() {
        GenerationError::Request(format!("HTTP {}", status))
    } else {
        GenerationError::Request(format!("HTTP {}: {}", status, detail))
    }
}

impl GenerationClient for OpenAiClient {
    fn complete(&self, system: &str, user: &str, options: &GenerationOptions) -> Result<String, GenerationError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey("OPENAI_API_KEY is empty".to_string()));
        }

        let body = request_body(system, user, options)?;
        log::info!("Requesting completion from {} with model {}", self.endpoint(), options.model);

        let mut response = ureq::post(&self.endpoint())
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.body_mut().read_to_string().unwrap_or_default();
            log::warn!("Completion request returned {}", status);
            return Err(api_error(status.as_u16(), &error_body));
        }

        let response_body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| GenerationError::Request(format!("Failed to read response: {}", e)))?;

        parse_reply(&response_body)
    }
}
