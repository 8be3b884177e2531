// Tests for playback sequencing and the post-playback continuation
//
// Fake sink and navigator implementations record an ordered event log so
// the tests can assert both how often and in what order things fired.

use agrivoice::playback::{AudioSink, Navigator, PlaybackError, PlaybackOrchestrator};
use agrivoice::response::{normalize, NormalizedResponse};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn snapshot(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

struct FakeSink {
    log: EventLog,
    fail: bool,
}

#[async_trait::async_trait]
impl AudioSink for FakeSink {
    async fn play(&self, url: &str) -> Result<(), PlaybackError> {
        self.log.push(format!("play:{}", url));
        if self.fail {
            Err(PlaybackError("autoplay blocked".to_string()))
        } else {
            self.log.push("play-finished");
            Ok(())
        }
    }
}

struct FakeNavigator {
    log: EventLog,
}

impl Navigator for FakeNavigator {
    fn navigate(&self, url: &str) {
        self.log.push(format!("navigate:{}", url));
    }
}

fn orchestrator(fail_playback: bool) -> (PlaybackOrchestrator, EventLog) {
    let log = EventLog::default();
    let orchestrator = PlaybackOrchestrator::new(
        Arc::new(FakeSink {
            log: log.clone(),
            fail: fail_playback,
        }),
        Arc::new(FakeNavigator { log: log.clone() }),
        "http://localhost:8000".to_string(),
    );
    (orchestrator, log)
}

fn response(audio_url: Option<&str>, redirect_url: Option<&str>) -> NormalizedResponse {
    let mut raw = json!({ "message": "ok" });
    if let Some(url) = audio_url {
        raw["audio_url"] = json!(url);
    }
    if let Some(url) = redirect_url {
        raw["redirect"] = json!(true);
        raw["redirect_url"] = json!(url);
    }
    normalize(&raw)
}

#[tokio::test]
async fn test_continuation_fires_after_playback_completes() {
    let (orchestrator, log) = orchestrator(false);

    orchestrator
        .play(&response(Some("/static/reply.mp3"), Some("/dashboard")))
        .await;

    assert_eq!(
        log.snapshot(),
        vec![
            "play:http://localhost:8000/static/reply.mp3",
            "play-finished",
            "navigate:/dashboard",
        ]
    );
}

#[tokio::test]
async fn test_blocked_playback_still_fires_continuation_once() {
    let (orchestrator, log) = orchestrator(true);

    orchestrator
        .play(&response(Some("/static/reply.mp3"), Some("/dashboard")))
        .await;

    let events = log.snapshot();
    let navigations = events.iter().filter(|e| e.starts_with("navigate:")).count();
    assert_eq!(navigations, 1, "continuation must fire exactly once");
    assert_eq!(events.last().unwrap(), "navigate:/dashboard");
}

#[tokio::test]
async fn test_continuation_fires_immediately_without_audio() {
    let (orchestrator, log) = orchestrator(false);

    orchestrator.play(&response(None, Some("/dashboard"))).await;

    // No playback attempt at all, just the navigation.
    assert_eq!(log.snapshot(), vec!["navigate:/dashboard"]);
}

#[tokio::test]
async fn test_no_continuation_means_nothing_after_audio() {
    let (orchestrator, log) = orchestrator(false);

    orchestrator.play(&response(Some("/static/reply.mp3"), None)).await;

    let events = log.snapshot();
    assert!(events.iter().all(|e| !e.starts_with("navigate:")));
}

#[tokio::test]
async fn test_playback_failure_without_continuation_is_silent() {
    let (orchestrator, log) = orchestrator(true);

    orchestrator.play(&response(Some("/static/reply.mp3"), None)).await;

    let events = log.snapshot();
    assert_eq!(events.len(), 1);
    assert!(events[0].starts_with("play:"));
}

#[tokio::test]
async fn test_absolute_audio_urls_are_not_rewritten() {
    let (orchestrator, log) = orchestrator(false);

    orchestrator
        .play(&response(Some("https://cdn.example.com/reply.mp3"), None))
        .await;

    assert_eq!(
        log.snapshot()[0],
        "play:https://cdn.example.com/reply.mp3"
    );
}
