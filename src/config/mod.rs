//! Configuration for the voice dashboard core

pub mod file;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use self::file::DashboardConfigFile;
use crate::dashboard::{Track, VehicleState};
use crate::{Error, Result};

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixed trip origin; the first stop of every planned trip
    pub origin: String,

    /// Vehicle GPS coordinates sent with suggestion requests
    pub location: String,

    /// Initial vehicle state (fuel/speed are then fed by telemetry)
    pub vehicle: VehicleConfig,

    /// Fixed ordered playlist
    pub playlist: Vec<Track>,

    /// Seconds between suggestion refresh ticks
    pub suggestion_interval_secs: u64,

    /// AI gateway settings
    pub ai: AiConfig,
}

/// Initial vehicle state values
#[derive(Debug, Clone)]
pub struct VehicleConfig {
    /// Fuel level in percent
    pub fuel_percent: u8,

    /// Cabin temperature in °C
    pub cabin_temp_c: i32,

    /// Speed in km/h
    pub speed_kph: u32,

    /// Initial destination
    pub destination: String,
}

/// AI gateway settings shared by all three services
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// OpenAI-compatible base URL
    pub base_url: String,

    /// API key (from `VAHAN_API_KEY`, falling back to `OPENAI_API_KEY`)
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Per-request timeout in seconds; a timed-out call is a failed call
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: "New Delhi".to_string(),
            location: "28.6139, 77.2090".to_string(),
            vehicle: VehicleConfig {
                fuel_percent: 75,
                cabin_temp_c: 22,
                speed_kph: 60,
                destination: "India Gate, New Delhi".to_string(),
            },
            playlist: default_playlist(),
            suggestion_interval_secs: 300,
            ai: AiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the TOML file overlay, then
    /// environment variables for secrets
    ///
    /// # Errors
    ///
    /// Returns error if an explicitly given config file is missing or
    /// malformed, or if the resulting configuration is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => Self::default_path().filter(|p| p.exists()),
        };

        if let Some(ref p) = file_path {
            let raw = std::fs::read_to_string(p)?;
            let overlay: DashboardConfigFile = toml::from_str(&raw)?;
            config.apply_overlay(overlay);
            tracing::debug!(path = %p.display(), "config file loaded");
        }

        config.ai.api_key = std::env::var("VAHAN_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Default config file path (`~/.config/voicevahan/config.toml`)
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "voicevahan").map(|d| d.config_dir().join("config.toml"))
    }

    /// Initial vehicle state for the store
    #[must_use]
    pub fn initial_vehicle(&self) -> VehicleState {
        VehicleState {
            fuel_percent: self.vehicle.fuel_percent.min(100),
            cabin_temp_c: self.vehicle.cabin_temp_c,
            speed_kph: self.vehicle.speed_kph,
            destination: self.vehicle.destination.clone(),
        }
    }

    fn apply_overlay(&mut self, overlay: DashboardConfigFile) {
        if let Some(origin) = overlay.origin {
            self.origin = origin;
        }
        if let Some(location) = overlay.location {
            self.location = location;
        }
        if let Some(fuel) = overlay.vehicle.fuel_percent {
            self.vehicle.fuel_percent = fuel;
        }
        if let Some(temp) = overlay.vehicle.cabin_temp_c {
            self.vehicle.cabin_temp_c = temp;
        }
        if let Some(speed) = overlay.vehicle.speed_kph {
            self.vehicle.speed_kph = speed;
        }
        if let Some(destination) = overlay.vehicle.destination {
            self.vehicle.destination = destination;
        }
        if let Some(playlist) = overlay.playlist {
            self.playlist = playlist;
        }
        if let Some(interval) = overlay.suggestions.interval_secs {
            self.suggestion_interval_secs = interval;
        }
        if let Some(base_url) = overlay.ai.base_url {
            self.ai.base_url = base_url;
        }
        if let Some(model) = overlay.ai.model {
            self.ai.model = model;
        }
        if let Some(timeout) = overlay.ai.timeout_secs {
            self.ai.timeout_secs = timeout;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(Error::Config("playlist must not be empty".to_string()));
        }
        if self.suggestion_interval_secs == 0 {
            return Err(Error::Config(
                "suggestions.interval_secs must be at least 1".to_string(),
            ));
        }
        if self.ai.timeout_secs == 0 {
            return Err(Error::Config("ai.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// The original five-track playlist
fn default_playlist() -> Vec<Track> {
    let tracks = [
        ("Chaiyya Chaiyya", "Sukhwinder Singh, Sapna Awasthi"),
        ("Kajra Re", "Alisha Chinai, Shankar Mahadevan, Javed Ali"),
        ("Jai Ho", "A. R. Rahman, Sukhwinder Singh, Tanvi Shah"),
        ("Genda Phool", "Badshah, Payal Dev"),
        ("Apna Bana Le", "Arijit Singh"),
    ];

    tracks
        .into_iter()
        .map(|(title, artist)| Track {
            title: title.to_string(),
            artist: artist.to_string(),
        })
        .collect()
}
