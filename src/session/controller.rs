use crate::audio::encode_wav;
use crate::client::SubmissionClient;
use crate::error::{Result, SessionError};
use crate::playback::PlaybackOrchestrator;
use crate::recording::{RecorderState, RecordingController};
use crate::response::{normalize, NormalizedResponse};
use tracing::info;

/// Drives one voice or text query end to end
///
/// Pipeline: record -> finalize -> submit -> normalize -> play ->
/// continuation. Every exit path, successful or not, leaves the controller
/// back in `Idle` so the user can re-initiate; nothing is retried
/// automatically. Only one session is active at a time — re-entrant starts
/// are guarded no-ops inside the recording controller.
pub struct SessionController {
    recorder: RecordingController,
    client: SubmissionClient,
    orchestrator: PlaybackOrchestrator,
}

impl SessionController {
    pub fn new(
        recorder: RecordingController,
        client: SubmissionClient,
        orchestrator: PlaybackOrchestrator,
    ) -> Self {
        Self {
            recorder,
            client,
            orchestrator,
        }
    }

    /// Begin capturing a spoken question
    ///
    /// No-op while a recording is already active. A microphone failure is
    /// returned to the caller and the controller stays idle.
    pub async fn start_recording(&mut self) -> Result<()> {
        self.recorder.start().await
    }

    /// Stop the recording and run the rest of the session pipeline
    ///
    /// Returns `None` when no recording was active (guarded no-op, nothing
    /// is submitted). The optional typed question rides along with the audio.
    pub async fn stop_and_submit(
        &mut self,
        question: Option<&str>,
    ) -> Result<Option<NormalizedResponse>> {
        let audio = match self.recorder.stop().await? {
            Some(audio) => audio,
            None => return Ok(None),
        };

        let session_id = uuid::Uuid::new_v4();
        info!(
            %session_id,
            chunks = audio.chunk_count,
            samples = audio.sample_count,
            "submitting voice query"
        );

        let normalized = self.run_pipeline(audio.wav_bytes, question).await?;
        Ok(Some(normalized))
    }

    /// Typed-question entry surface
    ///
    /// Shares the full pipeline with the voice surface — including playback
    /// and the redirect continuation — carrying an empty audio artifact so
    /// the multipart contract stays fixed.
    pub async fn submit_text(&self, question: &str) -> Result<NormalizedResponse> {
        let empty_audio = encode_wav(&[], self.recorder.config().sample_rate)
            .map_err(|e| SessionError::AudioProcessing(e.to_string()))?;

        let session_id = uuid::Uuid::new_v4();
        info!(%session_id, "submitting text query");

        self.run_pipeline(empty_audio, Some(question)).await
    }

    /// submit -> normalize -> play -> continuation
    async fn run_pipeline(
        &self,
        audio: Vec<u8>,
        question: Option<&str>,
    ) -> Result<NormalizedResponse> {
        // A failed submission produces no normalized state at all.
        let raw = self.client.submit(audio, question).await?;

        let normalized = normalize(&raw);
        self.orchestrator.play(&normalized).await;

        Ok(normalized)
    }

    pub fn state(&self) -> RecorderState {
        self.recorder.state()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }
}
