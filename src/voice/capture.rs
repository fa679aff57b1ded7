//! Speech capture adapter contract
//!
//! The underlying speech-to-text engine is a black box behind this trait;
//! it reports recognition progress as [`CaptureEvent`]s on an mpsc channel.

use crate::Result;

/// Error code reported by a capture backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureErrorCode {
    /// The engine heard nothing; suppressed from user-visible notices
    NoSpeech,
    /// Any other engine-specific failure
    Other(String),
}

/// Recognition lifecycle events emitted by a capture backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The engine began a capture session
    Started,

    /// The engine ended the capture session; authoritative for leaving
    /// the listening state
    Ended,

    /// A recognition error occurred mid-session
    Error(CaptureErrorCode),

    /// A partial or final transcript
    Transcript {
        /// Recognized text so far
        text: String,
        /// Whether this is the final result for the session
        is_final: bool,
    },
}

/// A speech capture backend
///
/// Implementations emit [`CaptureEvent`]s on the channel they were
/// constructed with. `start` and `stop` only control the capture stream;
/// turn-state transitions belong to the orchestrator.
pub trait SpeechCapture: Send + Sync {
    /// Begin a capture session
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CaptureUnavailable`] if no speech engine is
    /// present.
    fn start(&self) -> Result<()>;

    /// Stop the active capture session
    ///
    /// Best-effort; the backend's own `Ended` event remains authoritative
    /// for the session actually being over.
    fn stop(&self);
}
