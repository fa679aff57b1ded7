//! Error types for the voice dashboard core

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the voice dashboard core
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// No speech engine is available; voice input is disabled but the
    /// rest of the dashboard keeps running
    #[error("speech capture unavailable")]
    CaptureUnavailable,

    /// Mid-session speech recognition error
    #[error("capture error: {0}")]
    Capture(String),

    /// AI service call failed or timed out
    #[error("AI call failed: {0}")]
    Ai(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
