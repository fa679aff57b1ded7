//! TOML configuration file loading
//!
//! Supports `~/.config/voicevahan/config.toml` as a persistent config
//! source. All fields are optional — the file is a partial overlay on top
//! of defaults.

use serde::Deserialize;

use crate::dashboard::Track;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct DashboardConfigFile {
    /// Fixed trip origin (e.g. "New Delhi")
    pub origin: Option<String>,

    /// Vehicle GPS coordinates for suggestion context
    pub location: Option<String>,

    /// Initial vehicle state
    #[serde(default)]
    pub vehicle: VehicleFileConfig,

    /// Fixed ordered playlist; replaces the default wholesale when present
    pub playlist: Option<Vec<Track>>,

    /// Suggestion refresh configuration
    #[serde(default)]
    pub suggestions: SuggestionsFileConfig,

    /// AI gateway configuration
    #[serde(default)]
    pub ai: AiFileConfig,
}

/// Initial vehicle state overrides
#[derive(Debug, Default, Deserialize)]
pub struct VehicleFileConfig {
    /// Fuel level in percent
    pub fuel_percent: Option<u8>,

    /// Cabin temperature in °C
    pub cabin_temp_c: Option<i32>,

    /// Speed in km/h
    pub speed_kph: Option<u32>,

    /// Initial destination
    pub destination: Option<String>,
}

/// Suggestion refresh overrides
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsFileConfig {
    /// Seconds between refresh ticks
    pub interval_secs: Option<u64>,
}

/// AI gateway overrides
#[derive(Debug, Default, Deserialize)]
pub struct AiFileConfig {
    /// OpenAI-compatible base URL
    pub base_url: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}
