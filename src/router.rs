//! Intent routing
//!
//! Maps a recognized utterance to a deterministic state effect and spoken
//! reply. Matching is case-insensitive substring testing in a fixed priority
//! order, first match wins. Everything here is pure; the single asynchronous
//! case (trip planning) is returned as a delegation marker for the
//! orchestrator to resolve.

use crate::dashboard::{Effect, MediaState, Playback, Track};

/// Phrase that introduces a navigation command
const NAVIGATE_PHRASE: &str = "navigate to";

/// Outcome of routing one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResult {
    /// A deterministic rule matched
    Handled {
        /// Mutation to apply to the store
        effect: Effect,
        /// Reply to speak
        reply: String,
    },

    /// The utterance asks for a trip plan; the orchestrator must await the
    /// trip planning service
    PlanTrip,

    /// No rule matched; fall through to the conversational AI
    Unhandled,
}

/// Route an utterance against the current media state and playlist
///
/// Vehicle state is not consulted by any rule; effects are applied against
/// whatever the store holds when the orchestrator commits them.
#[must_use]
pub fn route(utterance: &str, media: MediaState, playlist: &[Track]) -> RouteResult {
    // ASCII lowercasing keeps byte offsets aligned with the original text,
    // which the navigate rule relies on to preserve destination casing.
    let lower = utterance.to_ascii_lowercase();

    if lower.contains("temperature") {
        if let Some(temp) = first_integer(&lower) {
            return RouteResult::Handled {
                effect: Effect::SetCabinTemp(temp),
                reply: format!("Temperature set to {temp} degrees."),
            };
        }
    }

    if lower.contains("play music") {
        return RouteResult::Handled {
            effect: Effect::SetPlayback(Playback::Playing),
            reply: format!("Playing {}.", track_title(playlist, media.track_index)),
        };
    }

    if lower.contains("pause music") {
        return RouteResult::Handled {
            effect: Effect::SetPlayback(Playback::Paused),
            reply: "Music paused.".to_string(),
        };
    }

    if lower.contains("next song") {
        let next = wrap_index(media.track_index, 1, playlist.len());
        return RouteResult::Handled {
            effect: Effect::NextTrack,
            reply: format!("Playing next song: {}.", track_title(playlist, next)),
        };
    }

    if lower.contains("previous song") {
        let prev = wrap_index(media.track_index, playlist.len().saturating_sub(1), playlist.len());
        return RouteResult::Handled {
            effect: Effect::PreviousTrack,
            reply: format!("Playing previous song: {}.", track_title(playlist, prev)),
        };
    }

    if let Some(pos) = lower.find(NAVIGATE_PHRASE) {
        let destination = utterance[pos + NAVIGATE_PHRASE.len()..].trim();
        if !destination.is_empty() {
            return RouteResult::Handled {
                effect: Effect::SetDestination(destination.to_string()),
                reply: format!("Navigating to {destination}."),
            };
        }
        return RouteResult::Unhandled;
    }

    if lower.contains("plan a trip") {
        return RouteResult::PlanTrip;
    }

    RouteResult::Unhandled
}

/// First unsigned integer substring found anywhere in the text
fn first_integer(text: &str) -> Option<i32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn track_title(playlist: &[Track], index: usize) -> &str {
    playlist.get(index).map_or("music", |t| t.title.as_str())
}

const fn wrap_index(index: usize, step: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + step) % len }
}
