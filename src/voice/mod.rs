//! Voice adapter contracts
//!
//! Speech capture and synthesis engines are external; this module defines
//! the event contract they plug in behind, plus the bundled text-mode
//! backend used by dev rigs and tests.

mod capture;
mod output;
mod text;

pub use capture::{CaptureErrorCode, CaptureEvent, SpeechCapture};
pub use output::{LogSpeaker, SpeechOutput};
pub use text::TextCapture;
