//! The dashboard state store
//!
//! Single mutable source of truth for vehicle, media, trip, and suggestion
//! state. All reads are snapshots; all routed mutations go through
//! [`DashboardStore::apply`].

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::state::{
    MediaState, Playback, Stop, Suggestion, Track, TripPlan, VehicleState,
};

/// A described mutation produced by routing (or by trip planning /
/// suggestion refresh completion)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Set the cabin temperature (°C)
    SetCabinTemp(i32),

    /// Set playback status without changing the track
    SetPlayback(Playback),

    /// Advance to the next track (circular) and start playing
    NextTrack,

    /// Go back to the previous track (circular) and start playing
    PreviousTrack,

    /// Set a new destination, clearing any active trip plan
    SetDestination(String),

    /// Adopt a planned itinerary; the destination becomes the last stop's
    /// location in the same update
    AdoptTripPlan(Vec<Stop>),

    /// Replace the suggestion set wholesale
    ReplaceSuggestions(Vec<Suggestion>),
}

/// Explicit manual media controls (the on-screen buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    /// Toggle play/pause
    Toggle,
    /// Skip forward
    Next,
    /// Skip backward
    Previous,
}

#[derive(Debug)]
struct Inner {
    vehicle: VehicleState,
    media: MediaState,
    trip: Option<TripPlan>,
    suggestions: Vec<Suggestion>,
}

/// Holds all dashboard state behind a single lock
#[derive(Debug)]
pub struct DashboardStore {
    playlist: Vec<Track>,
    inner: RwLock<Inner>,
}

impl DashboardStore {
    /// Create a store with the given initial vehicle state and playlist
    #[must_use]
    pub fn new(vehicle: VehicleState, playlist: Vec<Track>) -> Self {
        Self {
            playlist,
            inner: RwLock::new(Inner {
                vehicle,
                media: MediaState {
                    playback: Playback::Paused,
                    track_index: 0,
                },
                trip: None,
                suggestions: Vec::new(),
            }),
        }
    }

    /// Snapshot of the current vehicle state
    #[must_use]
    pub fn vehicle(&self) -> VehicleState {
        self.read().vehicle.clone()
    }

    /// Snapshot of the current media state
    #[must_use]
    pub fn media(&self) -> MediaState {
        self.read().media
    }

    /// Snapshot of the active trip plan, if any
    #[must_use]
    pub fn trip_plan(&self) -> Option<TripPlan> {
        self.read().trip.clone()
    }

    /// Snapshot of the current suggestion set
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.read().suggestions.clone()
    }

    /// The fixed ordered playlist
    #[must_use]
    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    /// The track the media player is currently on
    #[must_use]
    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.media().track_index)
    }

    /// Apply a routed effect
    ///
    /// This is the single mutation entry point for the orchestrator; each
    /// effect is applied under one write lock, so observers never see a
    /// partial update (in particular, an adopted trip plan and the
    /// destination change together).
    pub fn apply(&self, effect: Effect) {
        let mut state = self.write();

        match effect {
            Effect::SetCabinTemp(temp) => state.vehicle.cabin_temp_c = temp,
            Effect::SetPlayback(playback) => state.media.playback = playback,
            Effect::NextTrack => {
                state.media.track_index = wrap_forward(state.media.track_index, self.playlist.len());
                state.media.playback = Playback::Playing;
            }
            Effect::PreviousTrack => {
                state.media.track_index =
                    wrap_backward(state.media.track_index, self.playlist.len());
                state.media.playback = Playback::Playing;
            }
            Effect::SetDestination(destination) => {
                state.vehicle.destination = destination;
                state.trip = None;
            }
            Effect::AdoptTripPlan(stops) => {
                let Some(last) = stops.last() else {
                    return;
                };
                state.vehicle.destination = last.location.clone();
                state.trip = Some(TripPlan { stops });
            }
            Effect::ReplaceSuggestions(suggestions) => state.suggestions = suggestions,
        }
    }

    /// Handle a manual media control (explicit UI action)
    pub fn media_control(&self, action: MediaAction) {
        match action {
            MediaAction::Toggle => {
                let mut state = self.write();
                state.media.playback = match state.media.playback {
                    Playback::Playing => Playback::Paused,
                    Playback::Paused => Playback::Playing,
                };
            }
            MediaAction::Next => self.apply(Effect::NextTrack),
            MediaAction::Previous => self.apply(Effect::PreviousTrack),
        }
    }

    /// Update the externally simulated telemetry inputs
    ///
    /// Voice commands never set these; this is the feed from the vehicle
    /// simulation (or the real CAN bus, eventually).
    pub fn set_telemetry(&self, fuel_percent: u8, speed_kph: u32) {
        let mut state = self.write();
        state.vehicle.fuel_percent = fuel_percent.min(100);
        state.vehicle.speed_kph = speed_kph;
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

const fn wrap_forward(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1) % len }
}

const fn wrap_backward(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + len - 1) % len }
}
