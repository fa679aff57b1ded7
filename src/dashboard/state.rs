//! Dashboard domain state types

/// Vehicle telemetry and navigation state
///
/// Fuel and speed are externally simulated inputs; voice commands never set
/// them. Temperature and destination are mutated through routed effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleState {
    /// Fuel level, 0..=100 percent
    pub fuel_percent: u8,

    /// Cabin temperature in degrees Celsius
    pub cabin_temp_c: i32,

    /// Current speed in km/h
    pub speed_kph: u32,

    /// Active navigation destination
    pub destination: String,
}

/// Playback status of the media player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Music is playing
    Playing,
    /// Music is paused
    Paused,
}

/// Media player state
///
/// `track_index` always indexes into the fixed playlist; advancing wraps
/// circularly in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaState {
    /// Current playback status
    pub playback: Playback,

    /// Index of the current track in the playlist
    pub track_index: usize,
}

/// A track in the fixed playlist
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Track {
    /// Song title
    pub title: String,
    /// Performing artist(s)
    pub artist: String,
}

/// Role of a stop within a trip plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    /// Starting point (always the fixed origin)
    Origin,
    /// Intermediate stop
    Stopover,
    /// Final destination
    Destination,
}

impl StopKind {
    /// Parse the service's free-form stop type label
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "origin" => Self::Origin,
            "destination" => Self::Destination,
            _ => Self::Stopover,
        }
    }
}

/// One leg of a planned trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Location name
    pub location: String,

    /// Role of this stop in the itinerary
    pub kind: StopKind,

    /// Short description of this leg of the journey
    pub description: String,
}

/// An ordered multi-stop itinerary
///
/// The first stop is always the fixed origin; the last stop's location is
/// the active destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPlan {
    /// Ordered stops, origin first
    pub stops: Vec<Stop>,
}

impl TripPlan {
    /// The final stop of the itinerary
    #[must_use]
    pub fn last_stop(&self) -> Option<&Stop> {
        self.stops.last()
    }
}

/// Category of a contextual suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Restaurant (lunch hours)
    Restaurant,
    /// Coffee shop (coffee hours)
    CoffeeShop,
    /// Gas station (low fuel)
    GasStation,
    /// Anything else the service comes up with
    Other,
}

impl SuggestionKind {
    /// Parse the service's free-form type label (e.g. "coffee shop")
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Self::Restaurant,
            "coffee shop" | "coffee" | "cafe" => Self::CoffeeShop,
            "gas station" | "petrol pump" | "fuel station" => Self::GasStation,
            _ => Self::Other,
        }
    }
}

/// A contextual suggestion from the suggestion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Category of the suggested place
    pub kind: SuggestionKind,

    /// Name of the suggested place
    pub name: String,

    /// GPS coordinates or location name
    pub location: String,

    /// Why the service suggested it
    pub reason: String,
}

/// One completed listen → process → respond cycle
///
/// Transient display state only; there is no cross-turn memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueTurn {
    /// The recognized utterance (empty for the initial greeting)
    pub utterance: String,

    /// The assistant's spoken response
    pub response: String,
}
