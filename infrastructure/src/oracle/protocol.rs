//! OpenAI-compatible chat completion wire types.

use insight_application::OracleError;
use insight_domain::truncate;
use serde::{Deserialize, Serialize};

/// Chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /v1/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Single-turn request carrying one user prompt.
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a successful response body.
///
/// A body without that field is a protocol error, not a transient one.
pub fn extract_reply_content(body: &str) -> Result<String, OracleError> {
    let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        OracleError::Protocol(format!(
            "invalid response body ({}): {}",
            e,
            truncate(body, 200)
        ))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            OracleError::Protocol(format!(
                "response has no choices[0].message.content: {}",
                truncate(body, 200)
            ))
        })
}
