use super::sink::AudioSink;
use crate::response::NormalizedResponse;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Navigation capability consumed by the continuation trigger
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Navigator that only logs the target, for headless use
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, url: &str) {
        info!(url, "navigation requested");
    }
}

/// Sequences audio playback and the post-playback continuation
///
/// The continuation fires exactly once per response:
/// - no audio: immediately
/// - playback completes: after the end-of-playback
/// - playback blocked or failed: immediately, with the failure swallowed
///
/// Without a continuation, nothing happens after the audio and the session
/// simply returns to idle.
pub struct PlaybackOrchestrator {
    sink: Arc<dyn AudioSink>,
    navigator: Arc<dyn Navigator>,
    origin: String,
}

impl PlaybackOrchestrator {
    pub fn new(sink: Arc<dyn AudioSink>, navigator: Arc<dyn Navigator>, origin: String) -> Self {
        Self {
            sink,
            navigator,
            origin,
        }
    }

    /// Play the response audio (if any) and fire the continuation (if any)
    pub async fn play(&self, response: &NormalizedResponse) {
        if let Some(path) = &response.audio_url {
            let url = resolve_against_origin(&self.origin, path);

            match self.sink.play(&url).await {
                Ok(()) => debug!("playback finished"),
                // Autoplay-style blocks are non-fatal; continue as if there
                // were no audio.
                Err(e) => warn!("audio playback failed: {}", e),
            }
        }

        if let Some(continuation) = &response.continuation {
            info!(url = %continuation.redirect_url, "following continuation");
            self.navigator.navigate(&continuation.redirect_url);
        }
    }
}

/// Resolve a possibly-relative audio path against the backend origin
fn resolve_against_origin(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), path)
    }
}
