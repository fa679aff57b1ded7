//! Text-mode capture backend
//!
//! Feeds typed text through the capture event contract, for dev rigs and
//! tests running without a speech engine. Each injected line behaves like a
//! recognized utterance: a final transcript followed by end-of-capture.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use super::capture::{CaptureErrorCode, CaptureEvent, SpeechCapture};
use crate::Result;

/// Capture backend driven by injected text
#[derive(Debug)]
pub struct TextCapture {
    events: mpsc::Sender<CaptureEvent>,
    active: AtomicBool,
}

impl TextCapture {
    /// Create a text capture that emits on the given channel
    #[must_use]
    pub const fn new(events: mpsc::Sender<CaptureEvent>) -> Self {
        Self {
            events,
            active: AtomicBool::new(false),
        }
    }

    /// Whether a capture session is active
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Inject an interim (partial) transcript
    pub fn push_partial(&self, text: &str) {
        if self.is_active() {
            self.emit(CaptureEvent::Transcript {
                text: text.to_string(),
                is_final: false,
            });
        }
    }

    /// Inject a final transcript and end the session
    pub fn push_final(&self, text: &str) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.emit(CaptureEvent::Transcript {
                text: text.to_string(),
                is_final: true,
            });
            self.emit(CaptureEvent::Ended);
        }
    }

    /// End the session without a final transcript (no speech)
    pub fn end_without_speech(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.emit(CaptureEvent::Error(CaptureErrorCode::NoSpeech));
            self.emit(CaptureEvent::Ended);
        }
    }

    /// Report a mid-session recognition error and end the session
    pub fn fail(&self, message: &str) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.emit(CaptureEvent::Error(CaptureErrorCode::Other(
                message.to_string(),
            )));
            self.emit(CaptureEvent::Ended);
        }
    }

    fn emit(&self, event: CaptureEvent) {
        if let Err(e) = self.events.try_send(event) {
            tracing::warn!(error = %e, "capture event dropped");
        }
    }
}

impl SpeechCapture for TextCapture {
    fn start(&self) -> Result<()> {
        if !self.active.swap(true, Ordering::SeqCst) {
            self.emit(CaptureEvent::Started);
        }
        Ok(())
    }

    fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.emit(CaptureEvent::Ended);
        }
    }
}
