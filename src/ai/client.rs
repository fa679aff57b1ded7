//! Shared chat-completions gateway client
//!
//! All three AI services speak the same OpenAI-compatible chat completions
//! endpoint; this wraps the wire format, the bounded request timeout, and
//! JSON-mode response parsing.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::AiConfig;
use crate::{Error, Result};

/// Request body for the chat completions endpoint
#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions endpoint
#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct ChatGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatGateway {
    /// Create a gateway client from AI configuration
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the HTTP client cannot
    /// be built
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("AI gateway API key required".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Run one completion and return the raw assistant text
    ///
    /// Single attempt, bounded by the configured timeout; retries are a
    /// caller policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ai`] on any transport, status, or decode failure
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
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
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Ai(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ai(format!("gateway returned {status}: {body}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| Error::Ai(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Ai("empty completion".to_string()))
    }

    /// Run one completion and parse the reply as JSON
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ai`] if the call fails or the reply is not the
    /// expected shape
    pub async fn complete_json<T: DeserializeOwned>(&self, system: &str, user: &str) -> Result<T> {
        let text = self.complete(system, user).await?;
        let json = strip_code_fences(&text);

        serde_json::from_str(json).map_err(|e| {
            tracing::debug!(reply = %text, "unparseable structured reply");
            Error::Ai(format!("malformed structured reply: {e}"))
        })
    }
}

/// Strip a surrounding markdown code fence, if present
///
/// Models often wrap JSON replies in a json-tagged fence even when asked
/// not to.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
