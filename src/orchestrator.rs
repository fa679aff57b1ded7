//! The orchestrator - listening state machine and dialogue pipeline
//!
//! Owns the `Idle → Listening → Processing → Idle` cycle, sequences
//! capture → routing → fallback → speech output for each turn, and runs
//! the periodic suggestion refresh loop. At most one turn is in flight at
//! a time; the refresh loop is the only background activity and never
//! touches the dialogue pipeline's critical section.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::ai::{ConversationalFallback, SuggestionRequest, SuggestionSource, TripPlanning};
use crate::config::Config;
use crate::dashboard::{DashboardStore, DialogueTurn, Effect};
use crate::router::{self, RouteResult};
use crate::voice::{CaptureErrorCode, CaptureEvent, SpeechCapture, SpeechOutput};
use crate::{Error, Result};

/// Greeting shown before the first turn
pub const GREETING: &str = "Hi! How can I help you? Tap the mic to speak.";

/// Fixed reply for any failed AI call; state is never mutated on this path
const APOLOGY: &str = "I'm having a little trouble right now. Please try again later.";

/// Spoken before the trip planning round-trip
const PLANNING_ACK: &str = "Okay, planning your trip...";

/// Listening lifecycle state, owned exclusively by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningState {
    /// Ready for a new turn
    Idle,
    /// Capture session active, waiting for a final transcript
    Listening,
    /// A turn is being processed; new turns are rejected
    Processing,
}

/// Sequences voice turns and keeps the suggestion feed fresh
pub struct Orchestrator {
    store: Arc<DashboardStore>,
    capture: Arc<dyn SpeechCapture>,
    speaker: Arc<dyn SpeechOutput>,
    fallback: Arc<dyn ConversationalFallback>,
    planner: Arc<dyn TripPlanning>,
    suggester: Arc<dyn SuggestionSource>,
    listening: watch::Sender<ListeningState>,
    transcript: Mutex<String>,
    last_turn: Mutex<DialogueTurn>,
    location: String,
    suggestion_interval: Duration,
}

impl Orchestrator {
    /// Create an orchestrator over the given store, adapters, and services
    #[must_use]
    pub fn new(
        store: Arc<DashboardStore>,
        capture: Arc<dyn SpeechCapture>,
        speaker: Arc<dyn SpeechOutput>,
        fallback: Arc<dyn ConversationalFallback>,
        planner: Arc<dyn TripPlanning>,
        suggester: Arc<dyn SuggestionSource>,
        config: &Config,
    ) -> Self {
        let (listening, _) = watch::channel(ListeningState::Idle);

        Self {
            store,
            capture,
            speaker,
            fallback,
            planner,
            suggester,
            listening,
            transcript: Mutex::new(String::new()),
            last_turn: Mutex::new(DialogueTurn {
                utterance: String::new(),
                response: GREETING.to_string(),
            }),
            location: config.location.clone(),
            suggestion_interval: Duration::from_secs(config.suggestion_interval_secs),
        }
    }

    /// Current listening state
    #[must_use]
    pub fn listening(&self) -> ListeningState {
        *self.listening.borrow()
    }

    /// Subscribe to listening state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListeningState> {
        self.listening.subscribe()
    }

    /// The transcript currently displayed (interim or final)
    #[must_use]
    pub fn transcript(&self) -> String {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The last completed dialogue turn (or the initial greeting)
    #[must_use]
    pub fn last_turn(&self) -> DialogueTurn {
        self.last_turn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Begin a listening session
    ///
    /// Valid only from `Idle`; while a turn is listening or processing the
    /// call is a no-op, enforcing at-most-one-concurrent-turn.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CaptureUnavailable`] if the capture backend
    /// cannot start; the state rolls back to `Idle`.
    pub fn start_listening(&self) -> Result<()> {
        if !self.try_transition(ListeningState::Idle, ListeningState::Listening) {
            tracing::debug!(state = ?self.listening(), "start_listening ignored while busy");
            return Ok(());
        }

        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        if let Err(e) = self.capture.start() {
            self.try_transition(ListeningState::Listening, ListeningState::Idle);
            return Err(e);
        }

        tracing::info!("listening");
        Ok(())
    }

    /// Stop the active listening session
    ///
    /// Valid from `Listening`; otherwise a no-op. Only the capture stream
    /// is cancelled — a turn that reached `Processing` always runs to
    /// completion. The backend's `Ended` event remains authoritative for
    /// the state transition, so an explicit stop and the engine's natural
    /// end cannot race.
    pub fn stop_listening(&self) {
        if self.listening() == ListeningState::Listening {
            self.capture.stop();
        } else {
            tracing::debug!(state = ?self.listening(), "stop_listening ignored");
        }
    }

    /// Run the orchestrator until shutdown
    ///
    /// Consumes capture events and drives the dialogue pipeline; owns the
    /// suggestion refresh task for its lifetime.
    pub async fn run(
        self: Arc<Self>,
        mut events: mpsc::Receiver<CaptureEvent>,
        mut shutdown: mpsc::Receiver<()>,
    ) {
        let refresh = self.spawn_suggestion_loop();

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::debug!("capture channel closed");
                        break;
                    };
                    self.handle_capture_event(event).await;
                }
            }
        }

        refresh.abort();
        self.capture.stop();
    }

    /// React to one capture event
    pub async fn handle_capture_event(&self, event: CaptureEvent) {
        match event {
            CaptureEvent::Started => {
                tracing::debug!("capture session started");
            }
            CaptureEvent::Transcript { text, is_final: false } => {
                if self.listening() == ListeningState::Listening {
                    *self.transcript.lock().unwrap_or_else(PoisonError::into_inner) = text;
                }
            }
            CaptureEvent::Transcript { text, is_final: true } => {
                // The Listening → Processing transition invalidates any
                // further capture events for this turn.
                if self.try_transition(ListeningState::Listening, ListeningState::Processing) {
                    self.transcript
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .clone_from(&text);
                    self.process_turn(&text).await;
                    self.try_transition(ListeningState::Processing, ListeningState::Idle);
                } else {
                    tracing::debug!(state = ?self.listening(), "stale final transcript ignored");
                }
            }
            CaptureEvent::Ended => {
                if self.try_transition(ListeningState::Listening, ListeningState::Idle) {
                    tracing::debug!("capture ended without a command");
                }
            }
            CaptureEvent::Error(CaptureErrorCode::NoSpeech) => {
                // Suppressed from user-visible notices.
                tracing::debug!("no speech detected");
                self.try_transition(ListeningState::Listening, ListeningState::Idle);
            }
            CaptureEvent::Error(CaptureErrorCode::Other(message)) => {
                let error = Error::Capture(message);
                tracing::warn!(error = %error, "speech recognition error");
                self.try_transition(ListeningState::Listening, ListeningState::Idle);
            }
        }
    }

    /// Process one finalized utterance: route, resolve, mutate, speak
    ///
    /// Sequential per turn; any AI round-trip is awaited before the next
    /// turn can start. Every failure path speaks the fixed apology and
    /// leaves state untouched.
    async fn process_turn(&self, utterance: &str) {
        tracing::info!(utterance, "processing command");

        let media = self.store.media();
        let response = match router::route(utterance, media, self.store.playlist()) {
            RouteResult::Handled { effect, reply } => {
                self.store.apply(effect);
                reply
            }
            RouteResult::PlanTrip => self.plan_trip(utterance).await,
            RouteResult::Unhandled => match self.fallback.ask(utterance).await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(error = %e, "conversational fallback failed");
                    APOLOGY.to_string()
                }
            },
        };

        self.speaker.speak(&response);

        *self.last_turn.lock().unwrap_or_else(PoisonError::into_inner) = DialogueTurn {
            utterance: utterance.to_string(),
            response,
        };
    }

    /// Delegate to the trip planning service
    ///
    /// On success the itinerary and the new destination land in the store
    /// in one atomic update; on failure nothing is mutated.
    async fn plan_trip(&self, utterance: &str) -> String {
        self.speaker.speak(PLANNING_ACK);

        match self.planner.plan(utterance).await {
            Ok(stops) => stops.last().map_or_else(
                || APOLOGY.to_string(),
                |last| {
                    let destination = last.location.clone();
                    self.store.apply(Effect::AdoptTripPlan(stops.clone()));
                    format!(
                        "I've planned a trip to {destination} for you. You can see the details \
                         on the screen."
                    )
                },
            ),
            Err(e) => {
                tracing::warn!(error = %e, "trip planning failed");
                APOLOGY.to_string()
            }
        }
    }

    /// Fetch suggestions once from a fresh context snapshot
    ///
    /// On success the suggestion set is replaced wholesale.
    ///
    /// # Errors
    ///
    /// Returns the service error; the caller keeps the stale set
    pub async fn refresh_suggestions(&self) -> Result<()> {
        let vehicle = self.store.vehicle();
        let request = SuggestionRequest {
            location: self.location.clone(),
            fuel_percent: vehicle.fuel_percent,
            time_of_day: time_of_day(),
            last_destination: (!vehicle.destination.is_empty()).then_some(vehicle.destination),
        };

        let suggestions = self.suggester.suggest(&request).await?;
        let count = suggestions.len();
        self.store.apply(Effect::ReplaceSuggestions(suggestions));
        tracing::info!(count, "suggestions refreshed");
        Ok(())
    }

    /// Spawn the periodic suggestion refresh task
    ///
    /// Ticks immediately so the dashboard has suggestions at startup. The
    /// task awaits each refresh and skips missed ticks, so refreshes never
    /// overlap and never queue.
    fn spawn_suggestion_loop(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let orchestrator = Arc::clone(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(orchestrator.suggestion_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if let Err(e) = orchestrator.refresh_suggestions().await {
                    tracing::warn!(error = %e, "suggestion refresh failed, keeping stale set");
                }
            }
        })
    }

    /// Wait until the listening state reaches `target`
    pub async fn wait_for(&self, target: ListeningState) {
        let mut rx = self.listening.subscribe();
        while *rx.borrow_and_update() != target {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn try_transition(&self, from: ListeningState, to: ListeningState) -> bool {
        let mut moved = false;
        self.listening.send_if_modified(|state| {
            if *state == from {
                *state = to;
                moved = true;
                true
            } else {
                false
            }
        });
        moved
    }
}

/// Wall-clock time of day, `HH:MM`
fn time_of_day() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
