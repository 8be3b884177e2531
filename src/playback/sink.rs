use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Playback failure (device unavailable, undecodable audio, fetch failure)
///
/// Never surfaced to the user: the orchestrator logs it and proceeds with
/// the continuation as if there were no audio.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PlaybackError(pub String);

/// Audio playback seam
///
/// Implementations:
/// - `RodioSink`: fetches the audio bytes and plays them on the default
///   output device
/// - test sinks that record calls and succeed or fail on demand
#[async_trait::async_trait]
pub trait AudioSink: Send + Sync {
    /// Fetch and play the audio at `url`, returning once playback finished
    async fn play(&self, url: &str) -> Result<(), PlaybackError>;
}

/// Default sink: reqwest fetch + rodio decode on the default output device
pub struct RodioSink {
    client: reqwest::Client,
}

impl RodioSink {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioSink for RodioSink {
    async fn play(&self, url: &str) -> Result<(), PlaybackError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlaybackError(format!("audio fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError(format!(
                "audio fetch returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlaybackError(format!("failed to read audio body: {}", e)))?
            .to_vec();

        debug!(size = bytes.len(), "audio fetched, starting playback");

        // rodio's sink blocks while draining, so playback runs off-runtime.
        tokio::task::spawn_blocking(move || {
            let (_stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| PlaybackError(format!("no output device: {}", e)))?;
            let sink = rodio::Sink::try_new(&handle)
                .map_err(|e| PlaybackError(format!("failed to open sink: {}", e)))?;
            let source = rodio::Decoder::new(Cursor::new(bytes))
                .map_err(|e| PlaybackError(format!("undecodable audio: {}", e)))?;

            sink.append(source);
            sink.sleep_until_end();

            Ok(())
        })
        .await
        .map_err(|e| PlaybackError(format!("playback task failed: {}", e)))?
    }
}
