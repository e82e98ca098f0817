//! Chat-completion transport capability.
//!
//! # Responsibility
//! - Define the injected HTTP capability used to request summaries.
//! - Provide a blocking `ureq` implementation for OpenAI-compatible APIs.
//!
//! # Invariants
//! - The credential is only ever sent as a bearer header, never logged.
//! - Non-2xx responses surface as `SummaryError::Http` with status and body.

use super::SummaryError;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("labnote/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 500;

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for a chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// HTTP capability for chat-completion requests.
///
/// Calls may be abandoned by the caller; there is no cancel token and no
/// ordering guarantee across calls.
pub trait ChatCompletionClient {
    /// Sends one request and returns the first completion's text.
    fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, SummaryError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct UreqChatClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl UreqChatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatCompletionClient for UreqChatClient {
    fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, SummaryError> {
        let started_at = Instant::now();
        info!(
            "event=summary_request module=summary status=start model={} messages={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {api_key}"))
            .set("Content-Type", "application/json")
            .set("User-Agent", USER_AGENT)
            .send_json(request);

        let result = match response {
            Ok(resp) => resp
                .into_json::<ChatResponse>()
                .map_err(|err| SummaryError::InvalidResponse(err.to_string()))
                .and_then(first_completion),
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(SummaryError::Http {
                    status,
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                })
            }
            Err(err) => Err(SummaryError::Transport(err.to_string())),
        };

        match &result {
            Ok(text) => info!(
                "event=summary_request module=summary status=ok duration_ms={} chars={}",
                started_at.elapsed().as_millis(),
                text.chars().count()
            ),
            Err(err) => error!(
                "event=summary_request module=summary status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }
}

fn first_completion(response: ChatResponse) -> Result<String, SummaryError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(SummaryError::EmptyResponse)
}
