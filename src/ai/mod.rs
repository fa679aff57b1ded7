//! AI service clients
//!
//! Three opaque request/response services behind traits: conversational
//! fallback, trip planning, and contextual suggestions. The bundled
//! implementations share one OpenAI-compatible chat gateway. All calls are
//! single-attempt with a bounded timeout; failures never crash the core.

mod client;
mod conversational;
mod suggestions;
mod trip;

pub use client::ChatGateway;
pub use conversational::{Conversational, ConversationalFallback};
pub use suggestions::{SuggestionRequest, SuggestionSource, Suggester};
pub use trip::{TripPlanner, TripPlanning};
