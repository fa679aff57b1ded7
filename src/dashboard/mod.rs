//! Dashboard state: domain types and the store
//!
//! The store is the single source of truth the widget tree renders from;
//! this core only mutates it through routed effects.

mod state;
mod store;

pub use state::{
    DialogueTurn, MediaState, Playback, Stop, StopKind, Suggestion, SuggestionKind, Track,
    TripPlan, VehicleState,
};
pub use store::{DashboardStore, Effect, MediaAction};
