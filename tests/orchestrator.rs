//! Orchestrator turn pipeline integration tests
//!
//! Drives the full listen → route → resolve → speak cycle with mock AI
//! services and the text capture backend.

use std::sync::Arc;

use voicevahan::dashboard::Playback;
use voicevahan::voice::{CaptureEvent, SpeechCapture};
use voicevahan::{Error, ListeningState};

mod common;
use common::{agra_itinerary, Harness, MockFallback, MockPlanner, MockSuggester};

fn harness(fallback: MockFallback) -> Harness {
    Harness::new(
        Arc::new(fallback),
        Arc::new(MockPlanner::failing()),
        Arc::new(MockSuggester::failing()),
    )
}

#[tokio::test]
async fn test_temperature_turn_mutates_state_and_replies() {
    let fallback = Arc::new(MockFallback::answering("unused"));
    let mut h = Harness::new(
        Arc::clone(&fallback) as _,
        Arc::new(MockPlanner::failing()),
        Arc::new(MockSuggester::failing()),
    );

    h.say("set temperature to 25").await;

    assert_eq!(h.store.vehicle().cabin_temp_c, 25);
    assert_eq!(h.speaker.spoken(), vec!["Temperature set to 25 degrees."]);
    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
    // Deterministic rules never reach the AI
    assert!(fallback.calls.lock().unwrap().is_empty());

    let turn = h.orchestrator.last_turn();
    assert_eq!(turn.utterance, "set temperature to 25");
    assert_eq!(turn.response, "Temperature set to 25 degrees.");
}

#[tokio::test]
async fn test_navigate_turn_sets_destination_and_clears_plan() {
    let mut h = Harness::new(
        Arc::new(MockFallback::answering("unused")),
        Arc::new(MockPlanner::planning(agra_itinerary())),
        Arc::new(MockSuggester::failing()),
    );

    h.say("plan a trip to Agra").await;
    assert!(h.store.trip_plan().is_some());

    h.say("navigate to Jaipur").await;

    assert_eq!(h.store.vehicle().destination, "Jaipur");
    assert!(h.store.trip_plan().is_none());
    assert_eq!(
        h.speaker.spoken().last().map(String::as_str),
        Some("Navigating to Jaipur.")
    );
}

#[tokio::test]
async fn test_media_turns_update_playback() {
    let mut h = harness(MockFallback::answering("unused"));

    h.say("play music").await;
    assert_eq!(h.store.media().playback, Playback::Playing);
    assert_eq!(
        h.speaker.spoken().last().map(String::as_str),
        Some("Playing Chaiyya Chaiyya.")
    );

    h.say("next song").await;
    assert_eq!(h.store.media().track_index, 1);

    h.say("pause music").await;
    assert_eq!(h.store.media().playback, Playback::Paused);
    assert_eq!(h.store.media().track_index, 1);
}

#[tokio::test]
async fn test_unhandled_turn_reaches_fallback() {
    let fallback = Arc::new(MockFallback::answering("The capital of France is Paris."));
    let mut h = Harness::new(
        Arc::clone(&fallback) as _,
        Arc::new(MockPlanner::failing()),
        Arc::new(MockSuggester::failing()),
    );

    h.say("what is the capital of France").await;

    assert_eq!(
        fallback.calls.lock().unwrap().as_slice(),
        ["what is the capital of France"]
    );
    assert_eq!(
        h.speaker.spoken(),
        vec!["The capital of France is Paris."]
    );
}

#[tokio::test]
async fn test_failed_fallback_apologizes_without_mutation() {
    let mut h = harness(MockFallback::failing());

    let vehicle_before = h.store.vehicle();
    let media_before = h.store.media();

    h.say("tell me a story").await;

    assert_eq!(h.store.vehicle(), vehicle_before);
    assert_eq!(h.store.media(), media_before);
    assert!(h.store.trip_plan().is_none());
    assert_eq!(
        h.speaker.spoken(),
        vec!["I'm having a little trouble right now. Please try again later."]
    );
    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
}

#[tokio::test]
async fn test_trip_plan_adopted_atomically() {
    let mut h = Harness::new(
        Arc::new(MockFallback::answering("unused")),
        Arc::new(MockPlanner::planning(agra_itinerary())),
        Arc::new(MockSuggester::failing()),
    );

    h.say("plan a trip to Agra with a lunch stop").await;

    let plan = h.store.trip_plan().expect("trip plan adopted");
    assert_eq!(plan.stops.len(), 3);
    assert_eq!(
        plan.last_stop().unwrap().location,
        h.store.vehicle().destination
    );

    let spoken = h.speaker.spoken();
    assert_eq!(spoken[0], "Okay, planning your trip...");
    assert_eq!(
        spoken[1],
        "I've planned a trip to Agra for you. You can see the details on the screen."
    );
}

#[tokio::test]
async fn test_failed_trip_planning_leaves_state_untouched() {
    let mut h = Harness::new(
        Arc::new(MockFallback::answering("unused")),
        Arc::new(MockPlanner::failing()),
        Arc::new(MockSuggester::failing()),
    );

    let destination_before = h.store.vehicle().destination;
    h.say("plan a trip to Agra").await;

    assert!(h.store.trip_plan().is_none());
    assert_eq!(h.store.vehicle().destination, destination_before);
    assert_eq!(
        h.speaker.spoken(),
        vec![
            "Okay, planning your trip...",
            "I'm having a little trouble right now. Please try again later.",
        ]
    );
    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
}

#[tokio::test]
async fn test_start_listening_is_noop_while_listening() {
    let mut h = harness(MockFallback::answering("unused"));

    h.orchestrator.start_listening().unwrap();
    assert_eq!(h.orchestrator.listening(), ListeningState::Listening);

    h.orchestrator.start_listening().unwrap();
    assert_eq!(h.orchestrator.listening(), ListeningState::Listening);

    h.pump().await;
    // Only one capture session was ever started
    assert_eq!(h.orchestrator.listening(), ListeningState::Listening);
}

#[tokio::test]
async fn test_start_listening_is_rejected_while_processing() {
    let (fallback, gate) = MockFallback::gated("done");
    let mut h = harness(fallback);

    h.orchestrator.start_listening().unwrap();
    h.capture.push_final("what is rust");

    // Drive the final transcript on a separate task; the gated fallback
    // holds the turn in Processing.
    let mut pending = Vec::new();
    while let Ok(event) = h.try_recv_event() {
        pending.push(event);
    }
    let final_transcript = pending
        .iter()
        .find(|e| matches!(e, CaptureEvent::Transcript { is_final: true, .. }))
        .cloned()
        .expect("final transcript emitted");

    let orchestrator = Arc::clone(&h.orchestrator);
    let turn = tokio::spawn(async move {
        orchestrator.handle_capture_event(final_transcript).await;
    });

    h.orchestrator.wait_for(ListeningState::Processing).await;

    h.orchestrator.start_listening().unwrap();
    assert_eq!(h.orchestrator.listening(), ListeningState::Processing);
    assert!(!h.capture.is_active());

    gate.add_permits(1);
    turn.await.unwrap();

    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
    assert_eq!(h.speaker.spoken(), vec!["done"]);
}

#[tokio::test]
async fn test_listening_transitions_are_observable() {
    let mut h = harness(MockFallback::answering("unused"));
    let mut state = h.orchestrator.subscribe();

    assert_eq!(*state.borrow_and_update(), ListeningState::Idle);

    h.orchestrator.start_listening().unwrap();
    assert!(state.has_changed().unwrap());
    assert_eq!(*state.borrow_and_update(), ListeningState::Listening);

    h.capture.push_final("pause music");
    h.pump().await;
    assert_eq!(*state.borrow_and_update(), ListeningState::Idle);
}

#[tokio::test]
async fn test_recognition_error_returns_to_idle() {
    let mut h = harness(MockFallback::answering("unused"));

    h.orchestrator.start_listening().unwrap();
    h.capture.fail("audio device lost");
    h.pump().await;

    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
    assert!(h.speaker.spoken().is_empty());
}

#[tokio::test]
async fn test_no_speech_returns_to_idle_silently() {
    let mut h = harness(MockFallback::answering("unused"));

    h.orchestrator.start_listening().unwrap();
    h.capture.end_without_speech();
    h.pump().await;

    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
    assert!(h.speaker.spoken().is_empty());
}

#[tokio::test]
async fn test_stop_listening_returns_to_idle_via_capture_end() {
    let mut h = harness(MockFallback::answering("unused"));

    h.orchestrator.start_listening().unwrap();
    h.orchestrator.stop_listening();
    h.pump().await;

    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
    assert!(!h.capture.is_active());
}

#[tokio::test]
async fn test_interim_transcript_updates_display_only() {
    let mut h = harness(MockFallback::answering("unused"));

    h.orchestrator.start_listening().unwrap();
    h.capture.push_partial("navigate");
    h.capture.push_partial("navigate to Agra");
    h.pump().await;

    assert_eq!(h.orchestrator.transcript(), "navigate to Agra");
    assert_eq!(h.orchestrator.listening(), ListeningState::Listening);
    assert!(h.speaker.spoken().is_empty());
}

#[tokio::test]
async fn test_stale_final_transcript_is_ignored_when_idle() {
    let h = harness(MockFallback::answering("unused"));

    h.orchestrator
        .handle_capture_event(CaptureEvent::Transcript {
            text: "set temperature to 30".to_string(),
            is_final: true,
        })
        .await;

    assert_eq!(h.orchestrator.listening(), ListeningState::Idle);
    assert_eq!(h.store.vehicle().cabin_temp_c, 22);
    assert!(h.speaker.spoken().is_empty());
}

/// Capture backend with no engine behind it
struct UnavailableCapture;

impl SpeechCapture for UnavailableCapture {
    fn start(&self) -> voicevahan::Result<()> {
        Err(Error::CaptureUnavailable)
    }

    fn stop(&self) {}
}

#[tokio::test]
async fn test_unavailable_capture_rolls_back_to_idle() {
    let config = voicevahan::Config::default();
    let store = Arc::new(voicevahan::dashboard::DashboardStore::new(
        config.initial_vehicle(),
        config.playlist.clone(),
    ));
    let speaker = Arc::new(common::RecordingSpeaker::default());

    let orchestrator = voicevahan::Orchestrator::new(
        store,
        Arc::new(UnavailableCapture),
        Arc::clone(&speaker) as _,
        Arc::new(MockFallback::answering("unused")),
        Arc::new(MockPlanner::failing()),
        Arc::new(MockSuggester::failing()),
        &config,
    );

    assert!(matches!(
        orchestrator.start_listening(),
        Err(Error::CaptureUnavailable)
    ));
    assert_eq!(orchestrator.listening(), ListeningState::Idle);
}
