//! `VoiceVahan` - voice command dispatch core for an in-vehicle dashboard
//!
//! This library turns a recognized utterance into vehicle-state mutations
//! and a spoken reply, while a background task keeps a contextual
//! suggestions feed fresh:
//! - Listening lifecycle state machine (idle / listening / processing)
//! - Deterministic intent routing with a conversational AI fallback
//! - Trip planning and suggestion services as opaque async calls
//! - A single dashboard store the widget tree renders from
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                Speech Capture / Output               │
//! │        (external engines behind trait adapters)      │
//! └────────────────────┬────────────────────────────────┘
//!                      │ transcript events
//! ┌────────────────────▼────────────────────────────────┐
//! │                   Orchestrator                       │
//! │  state machine │ intent router │ suggestion refresh  │
//! └──────┬──────────────┬───────────────────┬───────────┘
//!        │              │ unhandled / trip  │
//! ┌──────▼──────┐  ┌────▼─────────────┐  ┌──▼───────────┐
//! │  Dashboard  │  │  AI gateway      │  │  Suggestion  │
//! │  store      │  │  (chat/planner)  │  │  service     │
//! └─────────────┘  └──────────────────┘  └──────────────┘
//! ```

pub mod ai;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod orchestrator;
pub mod router;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use orchestrator::{ListeningState, Orchestrator};
