//! Speech output adapter contract

/// A speech synthesis backend
///
/// Fire-and-forget: `speak` queues the text and returns; no completion
/// signal is required.
pub trait SpeechOutput: Send + Sync {
    /// Speak the given text, best-effort
    fn speak(&self, text: &str);
}

/// Speech output that logs instead of synthesizing
///
/// The bundled backend for headless rigs; a TTS engine substitutes behind
/// the same trait.
#[derive(Debug, Default)]
pub struct LogSpeaker;

impl SpeechOutput for LogSpeaker {
    fn speak(&self, text: &str) {
        tracing::info!(text, "assistant");
        println!("vahan: {text}");
    }
}
