//! Trip planning service
//!
//! Turns a free-form planning utterance into an ordered multi-stop
//! itinerary. The first stop is always the fixed origin.

use async_trait::async_trait;

use super::client::ChatGateway;
use crate::dashboard::{Stop, StopKind};
use crate::{Error, Result};

/// Produces multi-stop itineraries from free-form requests
#[async_trait]
pub trait TripPlanning: Send + Sync {
    /// Plan a trip from the raw utterance
    ///
    /// The returned stops are ordered, origin first. An empty itinerary is
    /// reported as an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Ai`] on call failure, timeout, or an
    /// unusable itinerary
    async fn plan(&self, query: &str) -> Result<Vec<Stop>>;
}

#[derive(serde::Deserialize)]
struct PlanWire {
    stops: Vec<StopWire>,
}

#[derive(serde::Deserialize)]
struct StopWire {
    location: String,
    #[serde(alias = "type")]
    kind: String,
    #[serde(default)]
    description: String,
}

/// Gateway-backed trip planner
#[derive(Debug, Clone)]
pub struct TripPlanner {
    gateway: ChatGateway,
    origin: String,
}

impl TripPlanner {
    /// Create a trip planner with the fixed origin
    #[must_use]
    pub const fn new(gateway: ChatGateway, origin: String) -> Self {
        Self { gateway, origin }
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a road trip planning assistant. Based on the user's query, create a \
             multi-stop itinerary. The first stop must always be the origin, \"{}\". The final \
             stop must be the user's requested destination. Include any intermediate stops the \
             user mentions. Reply with JSON only, no prose, in the shape \
             {{\"stops\":[{{\"location\":\"...\",\"kind\":\"Origin|Stopover|Destination\",\
             \"description\":\"...\"}}]}}.",
            self.origin
        )
    }
}

#[async_trait]
impl TripPlanning for TripPlanner {
    async fn plan(&self, query: &str) -> Result<Vec<Stop>> {
        let wire: PlanWire = self
            .gateway
            .complete_json(&self.system_prompt(), query)
            .await?;

        if wire.stops.is_empty() {
            return Err(Error::Ai("trip planner returned an empty itinerary".to_string()));
        }

        let stops: Vec<Stop> = wire
            .stops
            .into_iter()
            .map(|s| Stop {
                kind: StopKind::from_label(&s.kind),
                location: s.location,
                description: s.description,
            })
            .collect();

        tracing::debug!(stops = stops.len(), "trip planned");
        Ok(stops)
    }
}
