use crate::audio::{encode_wav, AudioChunk, CaptureBackend, CaptureConfig};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Recording lifecycle states
///
/// `start()` is only valid from `Idle`, `stop()` only from `Recording`.
/// Invalid transitions are guarded no-ops rather than errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Finalizing,
}

/// Finalized capture artifact, ready for submission
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    /// WAV-encoded audio (16-bit PCM mono)
    pub wav_bytes: Vec<u8>,
    /// Number of chunks that were accumulated
    pub chunk_count: usize,
    /// Total number of samples across all chunks
    pub sample_count: usize,
    /// Sample rate of the encoded audio
    pub sample_rate: u32,
    /// When the recording started
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// Drives the microphone capture lifecycle for one session at a time
///
/// Owns the chunk buffer exclusively: it is cleared when a recording starts,
/// appended in arrival order while recording, and sealed into a single WAV
/// artifact when the recording stops. At most one recording is active per
/// controller; re-entrant `start()` calls do not reset the buffer.
pub struct RecordingController {
    backend: Box<dyn CaptureBackend>,
    config: CaptureConfig,
    state: RecorderState,
    buffer: Arc<Mutex<Vec<AudioChunk>>>,
    drain_task: Option<JoinHandle<()>>,
    started_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RecordingController {
    pub fn new(backend: Box<dyn CaptureBackend>, config: CaptureConfig) -> Self {
        Self {
            backend,
            config,
            state: RecorderState::Idle,
            buffer: Arc::new(Mutex::new(Vec::new())),
            drain_task: None,
            started_at: None,
        }
    }

    /// Begin a new recording
    ///
    /// Clears the chunk buffer, opens the capture device, and starts
    /// accumulating chunks as they arrive. A microphone failure leaves the
    /// controller in `Idle` with the error reported to the caller. Calling
    /// this while already recording is a no-op.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != RecorderState::Idle {
            warn!("recording already active, ignoring start");
            return Ok(());
        }

        self.buffer.lock().await.clear();

        // State stays Idle if the device cannot be opened.
        let mut chunk_rx = self.backend.start().await?;

        let buffer = Arc::clone(&self.buffer);
        let drain_task = tokio::spawn(async move {
            while let Some(chunk) = chunk_rx.recv().await {
                buffer.lock().await.push(chunk);
            }
            debug!("capture channel closed, accumulation finished");
        });

        self.drain_task = Some(drain_task);
        self.started_at = Some(chrono::Utc::now());
        self.state = RecorderState::Recording;
        info!(backend = self.backend.name(), "recording started");

        Ok(())
    }

    /// Stop the active recording and seal the captured audio
    ///
    /// Returns the finalized artifact, or `None` when no recording was
    /// active. Every chunk that arrived before the stop is included; a stop
    /// immediately after start still yields a (possibly empty) artifact.
    pub async fn stop(&mut self) -> Result<Option<RecordedAudio>> {
        if self.state != RecorderState::Recording {
            warn!("no active recording, ignoring stop");
            return Ok(None);
        }

        self.state = RecorderState::Finalizing;

        // Closing the backend closes the chunk channel; the drain task keeps
        // reading until every buffered chunk has been appended.
        if let Err(e) = self.backend.stop().await {
            warn!("capture backend stop failed: {}", e);
        }

        if let Some(task) = self.drain_task.take() {
            if let Err(e) = task.await {
                warn!("chunk accumulation task panicked: {}", e);
            }
        }

        let sealed = {
            let chunks = self.buffer.lock().await;
            let sample_count = chunks.iter().map(|c| c.samples.len()).sum();
            let sample_rate = chunks
                .first()
                .map(|c| c.sample_rate)
                .unwrap_or(self.config.sample_rate);

            encode_wav(chunks.as_slice(), self.config.sample_rate)
                .map_err(|e| crate::error::SessionError::AudioProcessing(e.to_string()))
                .map(|wav_bytes| RecordedAudio {
                    wav_bytes,
                    chunk_count: chunks.len(),
                    sample_count,
                    sample_rate,
                    started_at: self.started_at.take().unwrap_or_else(chrono::Utc::now),
                })
        };

        // Back to Idle on every exit path, including an encoding failure.
        self.state = RecorderState::Idle;
        let artifact = sealed?;
        info!(
            chunks = artifact.chunk_count,
            samples = artifact.sample_count,
            "recording finalized"
        );

        Ok(Some(artifact))
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Number of chunks accumulated so far
    pub async fn chunk_count(&self) -> usize {
        self.buffer.lock().await.len()
    }
}
