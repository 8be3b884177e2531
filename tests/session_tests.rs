// End-to-end session pipeline tests
//
// Wires a scripted capture backend, a stub advisory backend (axum), and
// fake playback/navigation collaborators into a full SessionController.

use agrivoice::audio::{AudioChunk, CaptureBackend, CaptureConfig};
use agrivoice::error::Result as SessionResult;
use agrivoice::playback::{AudioSink, Navigator, PlaybackError, PlaybackOrchestrator};
use agrivoice::recording::{RecorderState, RecordingController};
use agrivoice::{BackendConfig, SessionController, SessionError, SubmissionClient};
use anyhow::Result;
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

struct ScriptedBackend {
    chunks: Vec<AudioChunk>,
}

#[async_trait::async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn start(&mut self) -> SessionResult<mpsc::Receiver<AudioChunk>> {
        let (tx, rx) = mpsc::channel(64);
        let chunks = self.chunks.clone();
        tokio::spawn(async move {
            for chunk in chunks {
                let _ = tx.send(chunk).await;
            }
        });
        Ok(rx)
    }

    async fn stop(&mut self) -> SessionResult<()> {
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct SilentSink;

#[async_trait::async_trait]
impl AudioSink for SilentSink {
    async fn play(&self, _url: &str) -> Result<(), PlaybackError> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingNavigator {
    calls: AtomicUsize,
}

impl Navigator for CountingNavigator {
    fn navigate(&self, _url: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

async fn start_server(reply: Value, hits: Arc<AtomicUsize>) -> Result<String> {
    let app = Router::new().route(
        "/agent",
        post(move || {
            let reply = reply.clone();
            hits.fetch_add(1, Ordering::SeqCst);
            async move { Json(reply) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Ok(format!("http://{}", addr))
}

fn build_controller(
    origin: &str,
    chunks: Vec<AudioChunk>,
) -> (SessionController, Arc<CountingNavigator>) {
    let recorder = RecordingController::new(
        Box::new(ScriptedBackend { chunks }),
        CaptureConfig::default(),
    );
    let client = SubmissionClient::new(BackendConfig {
        origin: origin.to_string(),
        agent_path: "/agent".to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    let navigator = Arc::new(CountingNavigator::default());
    let orchestrator = PlaybackOrchestrator::new(
        Arc::new(SilentSink),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        origin.to_string(),
    );

    (
        SessionController::new(recorder, client, orchestrator),
        navigator,
    )
}

fn chunk(samples: Vec<i16>) -> AudioChunk {
    AudioChunk {
        samples,
        sample_rate: 16000,
        timestamp_ms: 0,
    }
}

#[tokio::test]
async fn test_voice_session_runs_full_pipeline() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let origin = start_server(
        json!({
            "message": "Weather in Pune is Clear with temperature 30.5°C",
            "redirect": true,
            "redirect_url": "/weather"
        }),
        Arc::clone(&hits),
    )
    .await?;

    let (mut controller, navigator) = build_controller(&origin, vec![chunk(vec![1, 2, 3])]);

    controller.start_recording().await?;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let response = controller
        .stop_and_submit(None)
        .await?
        .expect("active recording should submit");

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(response.weather.unwrap().location, "Pune");
    assert_eq!(navigator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), RecorderState::Idle);

    Ok(())
}

#[tokio::test]
async fn test_text_session_shares_the_pipeline() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let origin = start_server(
        json!({
            "message": "Field has soil moisture 42%",
            "redirect": true,
            "redirect_url": "/soil"
        }),
        Arc::clone(&hits),
    )
    .await?;

    let (controller, navigator) = build_controller(&origin, vec![]);

    let response = controller.submit_text("how wet is my field?").await?;

    assert_eq!(response.soil.unwrap().moisture_percent, 42.0);
    // The redirect continuation applies to the text surface too.
    assert_eq!(navigator.calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_server_error_leaves_no_partial_state() -> Result<()> {
    let app = Router::new().route(
        "/agent",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let origin = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (mut controller, navigator) = build_controller(&origin, vec![chunk(vec![1])]);

    controller.start_recording().await?;
    let err = controller.stop_and_submit(None).await.unwrap_err();

    assert!(matches!(err, SessionError::Server(500)));
    // No continuation, no playback, and the controller is ready again.
    assert_eq!(navigator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.state(), RecorderState::Idle);

    Ok(())
}

#[tokio::test]
async fn test_stop_without_start_submits_nothing() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let origin = start_server(json!({ "message": "hi" }), Arc::clone(&hits)).await?;

    let (mut controller, _navigator) = build_controller(&origin, vec![]);

    let response = controller.stop_and_submit(None).await?;
    assert!(response.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    Ok(())
}
