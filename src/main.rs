use agrivoice::{
    CaptureConfig, Config, LogNavigator, MicrophoneBackend, NormalizedResponse,
    PlaybackOrchestrator, RecordingController, RodioSink, SessionController, SubmissionClient,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "agrivoice", about = "Voice query client for the advisory backend")]
struct Cli {
    /// Config file to load (without extension)
    #[arg(long)]
    config: Option<String>,

    /// Override the backend origin
    #[arg(long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a typed question
    Ask { question: String },

    /// Record a spoken question for a fixed duration, then submit it
    Record {
        /// Recording duration in seconds
        #[arg(long, default_value_t = 5)]
        duration_secs: u64,

        /// Typed question to ride along with the audio
        #[arg(long)]
        question: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(origin) = cli.origin {
        cfg.backend.origin = origin;
    }

    info!(origin = %cfg.backend.origin, "using advisory backend");

    let capture = CaptureConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
    };
    let recorder = RecordingController::new(
        Box::new(MicrophoneBackend::new(capture.clone())),
        capture,
    );
    let client = SubmissionClient::new(cfg.backend.clone())?;
    let orchestrator = PlaybackOrchestrator::new(
        Arc::new(RodioSink::new()),
        Arc::new(LogNavigator),
        cfg.backend.origin.clone(),
    );

    let mut controller = SessionController::new(recorder, client, orchestrator);

    match cli.command {
        Command::Ask { question } => {
            let response = controller.submit_text(&question).await?;
            print_response(&response);
        }
        Command::Record {
            duration_secs,
            question,
        } => {
            controller.start_recording().await?;
            info!("recording for {}s", duration_secs);
            tokio::time::sleep(Duration::from_secs(duration_secs)).await;

            if let Some(response) = controller.stop_and_submit(question.as_deref()).await? {
                print_response(&response);
            }
        }
    }

    Ok(())
}

fn print_response(response: &NormalizedResponse) {
    if !response.message.is_empty() {
        println!("{}", response.message);
    }

    if let Some(weather) = &response.weather {
        println!(
            "Weather in {}: {}, {}°C",
            weather.location, weather.condition, weather.temperature
        );
    }

    if let Some(soil) = &response.soil {
        println!(
            "Soil: moisture {}%, pH {}, N/P/K {:?}/{:?}/{:?}",
            soil.moisture_percent, soil.ph, soil.nitrogen, soil.phosphorus, soil.potassium
        );
    }

    if let Some(continuation) = &response.continuation {
        println!("More details: {}", continuation.redirect_url);
    }
}
