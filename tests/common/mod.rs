//! Shared test utilities: mock AI services, a recording speaker, and an
//! orchestrator harness driven through the text capture backend

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use voicevahan::ai::{
    ConversationalFallback, SuggestionRequest, SuggestionSource, TripPlanning,
};
use voicevahan::dashboard::{DashboardStore, Stop, StopKind, Suggestion, SuggestionKind};
use voicevahan::voice::{CaptureEvent, SpeechCapture, SpeechOutput, TextCapture};
use voicevahan::{Config, Error, Orchestrator};

/// Speech output that records everything spoken
#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechOutput for RecordingSpeaker {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Conversational fallback returning a fixed answer (or failing), with an
/// optional gate to hold the call in flight
pub struct MockFallback {
    answer: Option<String>,
    pub calls: Mutex<Vec<String>>,
    gate: Option<Arc<tokio::sync::Semaphore>>,
}

impl MockFallback {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// A fallback that blocks until a permit is added to the returned gate
    pub fn gated(answer: &str) -> (Self, Arc<tokio::sync::Semaphore>) {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        (
            Self {
                answer: Some(answer.to_string()),
                calls: Mutex::new(Vec::new()),
                gate: Some(Arc::clone(&gate)),
            },
            gate,
        )
    }
}

#[async_trait]
impl ConversationalFallback for MockFallback {
    async fn ask(&self, query: &str) -> voicevahan::Result<String> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }
        self.answer
            .clone()
            .ok_or_else(|| Error::Ai("mock fallback failure".to_string()))
    }
}

/// Trip planner returning a fixed itinerary (or failing)
pub struct MockPlanner {
    stops: Option<Vec<Stop>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockPlanner {
    pub fn planning(stops: Vec<Stop>) -> Self {
        Self {
            stops: Some(stops),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            stops: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TripPlanning for MockPlanner {
    async fn plan(&self, query: &str) -> voicevahan::Result<Vec<Stop>> {
        self.calls.lock().unwrap().push(query.to_string());
        self.stops
            .clone()
            .ok_or_else(|| Error::Ai("mock planner failure".to_string()))
    }
}

/// Suggestion source returning a fixed set (or failing), recording every
/// request it receives
pub struct MockSuggester {
    suggestions: Option<Vec<Suggestion>>,
    pub requests: Mutex<Vec<SuggestionRequest>>,
    gate: Option<Arc<tokio::sync::Semaphore>>,
}

impl MockSuggester {
    pub fn suggesting(suggestions: Vec<Suggestion>) -> Self {
        Self {
            suggestions: Some(suggestions),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            suggestions: None,
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// A suggester that blocks each call until a permit is added to the
    /// returned gate; requests are recorded at call entry
    pub fn gated(suggestions: Vec<Suggestion>) -> (Self, Arc<tokio::sync::Semaphore>) {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        (
            Self {
                suggestions: Some(suggestions),
                requests: Mutex::new(Vec::new()),
                gate: Some(Arc::clone(&gate)),
            },
            gate,
        )
    }
}

#[async_trait]
impl SuggestionSource for MockSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> voicevahan::Result<Vec<Suggestion>> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }
        self.suggestions
            .clone()
            .ok_or_else(|| Error::Ai("mock suggester failure".to_string()))
    }
}

/// An orchestrator wired to mocks, driven through the text capture backend
pub struct Harness {
    pub store: Arc<DashboardStore>,
    pub capture: Arc<TextCapture>,
    pub speaker: Arc<RecordingSpeaker>,
    pub orchestrator: Arc<Orchestrator>,
    events: mpsc::Receiver<CaptureEvent>,
}

impl Harness {
    pub fn new(
        fallback: Arc<dyn ConversationalFallback>,
        planner: Arc<dyn TripPlanning>,
        suggester: Arc<dyn SuggestionSource>,
    ) -> Self {
        let config = Config::default();
        let store = Arc::new(DashboardStore::new(
            config.initial_vehicle(),
            config.playlist.clone(),
        ));

        let (events_tx, events) = mpsc::channel(32);
        let capture = Arc::new(TextCapture::new(events_tx));
        let speaker = Arc::new(RecordingSpeaker::default());

        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&store),
            Arc::clone(&capture) as Arc<dyn SpeechCapture>,
            Arc::clone(&speaker) as Arc<dyn SpeechOutput>,
            fallback,
            planner,
            suggester,
            &config,
        ));

        Self {
            store,
            capture,
            speaker,
            orchestrator,
            events,
        }
    }

    /// Take one pending capture event, if any
    pub fn try_recv_event(&mut self) -> Result<CaptureEvent, mpsc::error::TryRecvError> {
        self.events.try_recv()
    }

    /// Feed all pending capture events through the orchestrator
    pub async fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.orchestrator.handle_capture_event(event).await;
        }
    }

    /// Run one full voice turn: start listening, inject a final
    /// transcript, and drain the resulting events
    pub async fn say(&mut self, utterance: &str) {
        self.orchestrator
            .start_listening()
            .expect("capture should start");
        self.capture.push_final(utterance);
        self.pump().await;
    }
}

/// A two-stop Delhi → Agra itinerary
pub fn agra_itinerary() -> Vec<Stop> {
    vec![
        Stop {
            location: "New Delhi".to_string(),
            kind: StopKind::Origin,
            description: "Starting point".to_string(),
        },
        Stop {
            location: "Mathura".to_string(),
            kind: StopKind::Stopover,
            description: "Lunch stop".to_string(),
        },
        Stop {
            location: "Agra".to_string(),
            kind: StopKind::Destination,
            description: "The Taj Mahal".to_string(),
        },
    ]
}

/// A single gas-station suggestion
pub fn gas_station_suggestion() -> Suggestion {
    Suggestion {
        kind: SuggestionKind::GasStation,
        name: "Indian Oil, Ring Road".to_string(),
        location: "28.61, 77.21".to_string(),
        reason: "Fuel level is below 20%".to_string(),
    }
}
