use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use voicevahan::ai::{ChatGateway, Conversational, SuggestionRequest, SuggestionSource, Suggester, TripPlanner};
use voicevahan::dashboard::DashboardStore;
use voicevahan::router::{self, RouteResult};
use voicevahan::voice::{LogSpeaker, SpeechCapture, TextCapture};
use voicevahan::{Config, ListeningState, Orchestrator};

/// In-vehicle voice assistant dashboard core
#[derive(Parser)]
#[command(name = "vahan", version, about)]
struct Cli {
    /// Path to a config file (default: ~/.config/voicevahan/config.toml)
    #[arg(short, long, env = "VAHAN_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Route an utterance offline and print the result (no AI calls)
    Route {
        /// The utterance to route
        utterance: String,
    },
    /// Fetch contextual suggestions once and print them
    Suggest,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,voicevahan=info",
        1 => "info,voicevahan=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if let Some(command) = cli.command {
        return match command {
            Command::Route { utterance } => route_offline(&config, &utterance),
            Command::Suggest => suggest_once(&config).await,
        };
    }

    run_dashboard(config).await
}

/// Dry-run the deterministic router without any network access
fn route_offline(config: &Config, utterance: &str) -> anyhow::Result<()> {
    let store = DashboardStore::new(config.initial_vehicle(), config.playlist.clone());

    match router::route(utterance, store.media(), store.playlist()) {
        RouteResult::Handled { effect, reply } => {
            println!("handled: {effect:?}");
            println!("reply:   {reply}");
        }
        RouteResult::PlanTrip => println!("delegates to the trip planning service"),
        RouteResult::Unhandled => println!("unhandled: falls through to the conversational AI"),
    }

    Ok(())
}

/// One-shot suggestion fetch with the configured context
async fn suggest_once(config: &Config) -> anyhow::Result<()> {
    let gateway = ChatGateway::new(&config.ai)?;
    let suggester = Suggester::new(gateway);

    let request = SuggestionRequest {
        location: config.location.clone(),
        fuel_percent: config.vehicle.fuel_percent,
        time_of_day: chrono::Local::now().format("%H:%M").to_string(),
        last_destination: Some(config.vehicle.destination.clone()),
    };

    let suggestions = suggester.suggest(&request).await?;
    for s in &suggestions {
        println!("{:?}: {} @ {} - {}", s.kind, s.name, s.location, s.reason);
    }

    Ok(())
}

/// Run the interactive dashboard loop
///
/// Typed lines stand in for recognized utterances; a speech engine plugs
/// in behind the same capture contract.
async fn run_dashboard(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(DashboardStore::new(
        config.initial_vehicle(),
        config.playlist.clone(),
    ));

    let gateway = ChatGateway::new(&config.ai)?;
    let fallback = Arc::new(Conversational::new(gateway.clone()));
    let planner = Arc::new(TripPlanner::new(gateway.clone(), config.origin.clone()));
    let suggester = Arc::new(Suggester::new(gateway));

    let (events_tx, events_rx) = mpsc::channel(32);
    let capture = Arc::new(TextCapture::new(events_tx));
    let speaker = Arc::new(LogSpeaker);

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&store),
        Arc::clone(&capture) as Arc<dyn SpeechCapture>,
        speaker,
        fallback,
        planner,
        suggester,
        &config,
    ));

    // Set up shutdown signal
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx_clone.send(()).await;
        }
    });

    let runner = tokio::spawn(Arc::clone(&orchestrator).run(events_rx, shutdown_rx));

    println!("vahan: {}", orchestrator.last_turn().response);
    println!("(type a command, or \"quit\" to exit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        if let Err(e) = orchestrator.start_listening() {
            tracing::error!(error = %e, "voice input unavailable");
            break;
        }
        capture.push_final(line);
        orchestrator.wait_for(ListeningState::Idle).await;
    }

    let _ = shutdown_tx.send(()).await;
    runner.await?;

    Ok(())
}
