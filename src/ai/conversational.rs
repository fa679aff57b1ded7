//! Conversational fallback service
//!
//! Answers free-form queries when no deterministic routing rule matches.

use async_trait::async_trait;

use super::client::ChatGateway;
use crate::Result;

const SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable in-car voice assistant named \
VoiceVahan. You can answer questions on a wide variety of topics. The user is speaking to you \
from their car. Keep your answers concise and to the point. If you don't know the answer, say so.";

/// The generative conversational path used when no rule matches
#[async_trait]
pub trait ConversationalFallback: Send + Sync {
    /// Answer a free-form query
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Ai`] on call failure or timeout
    async fn ask(&self, query: &str) -> Result<String>;
}

/// Gateway-backed conversational fallback
#[derive(Debug, Clone)]
pub struct Conversational {
    gateway: ChatGateway,
}

impl Conversational {
    /// Create a conversational fallback over the given gateway
    #[must_use]
    pub const fn new(gateway: ChatGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ConversationalFallback for Conversational {
    async fn ask(&self, query: &str) -> Result<String> {
        let answer = self.gateway.complete(SYSTEM_PROMPT, query).await?;
        tracing::debug!(chars = answer.len(), "conversational reply");
        Ok(answer)
    }
}
