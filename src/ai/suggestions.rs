//! Contextual suggestion service
//!
//! Proactively suggests nearby places from a snapshot of vehicle context.
//! Results replace the previous set wholesale; they are never merged.

use async_trait::async_trait;

use super::client::ChatGateway;
use crate::dashboard::{Suggestion, SuggestionKind};
use crate::Result;

/// Context snapshot sent with each suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Current GPS coordinates of the vehicle
    pub location: String,

    /// Current fuel level in percent
    pub fuel_percent: u8,

    /// Wall-clock time of day, formatted `HH:MM`
    pub time_of_day: String,

    /// Last known destination, if any
    pub last_destination: Option<String>,
}

/// Produces ranked contextual suggestions
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Fetch suggestions for the given context snapshot
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Ai`] on call failure or timeout
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>>;
}

#[derive(serde::Deserialize)]
struct SuggestionsWire {
    suggestions: Vec<SuggestionWire>,
}

#[derive(serde::Deserialize)]
struct SuggestionWire {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    reason: String,
}

const SYSTEM_PROMPT: &str = "You are an AI assistant in a car that proactively provides smart \
suggestions to the driver based on their current context. Suggest relevant services such as \
nearby restaurants, coffee shops, or gas stations, with a reason for each. If the fuel level is \
below 20%, suggest gas stations. If it's around lunch time (11:30 - 13:30), suggest restaurants. \
If it's around coffee time (07:00 - 09:00 or 14:00 - 16:00), suggest coffee shops. Reply with \
JSON only, no prose, in the shape {\"suggestions\":[{\"type\":\"restaurant|coffee shop|gas \
station\",\"name\":\"...\",\"location\":\"...\",\"reason\":\"...\"}]}.";

/// Gateway-backed suggestion service
#[derive(Debug, Clone)]
pub struct Suggester {
    gateway: ChatGateway,
}

impl Suggester {
    /// Create a suggester over the given gateway
    #[must_use]
    pub const fn new(gateway: ChatGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl SuggestionSource for Suggester {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>> {
        let user = format!(
            "It is now {}. The vehicle's current location is: {}. The fuel level is: {}%. The \
             last known destination was: {}.",
            request.time_of_day,
            request.location,
            request.fuel_percent,
            request.last_destination.as_deref().unwrap_or("unknown"),
        );

        let wire: SuggestionsWire = self.gateway.complete_json(SYSTEM_PROMPT, &user).await?;

        let suggestions: Vec<Suggestion> = wire
            .suggestions
            .into_iter()
            .map(|s| Suggestion {
                kind: SuggestionKind::from_label(&s.kind),
                name: s.name,
                location: s.location,
                reason: s.reason,
            })
            .collect();

        tracing::debug!(count = suggestions.len(), "suggestions fetched");
        Ok(suggestions)
    }
}
