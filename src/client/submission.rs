use crate::config::BackendConfig;
use crate::error::{Result, SessionError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Fixed filename for the audio part of the multipart request
const AUDIO_PART_FILENAME: &str = "query.wav";

/// MIME type of the capture container format
const AUDIO_PART_MIME: &str = "audio/wav";

/// Client for one-shot submissions to the advisory agent endpoint
///
/// Each submission is a single multipart POST carrying the sealed audio
/// artifact and, when non-empty, the typed question. Failures are mapped to
/// the session error taxonomy and never retried here; retry is the caller's
/// decision.
pub struct SubmissionClient {
    client: Client,
    config: BackendConfig,
}

impl SubmissionClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Backend origin the client was configured with
    pub fn origin(&self) -> &str {
        &self.config.origin
    }

    fn agent_url(&self) -> String {
        format!("{}{}", self.config.origin, self.config.agent_path)
    }

    /// Submit one query to the advisory backend
    ///
    /// `audio` is the WAV-encoded capture; `question` is attached as a text
    /// part only when non-empty. On success the parsed JSON body is returned
    /// unmodified for the normalizer to consume.
    pub async fn submit(&self, audio: Vec<u8>, question: Option<&str>) -> Result<Value> {
        let audio_part = Part::bytes(audio)
            .file_name(AUDIO_PART_FILENAME)
            .mime_str(AUDIO_PART_MIME)
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let mut form = Form::new().part("audio", audio_part);

        if let Some(text) = question.filter(|t| !t.is_empty()) {
            form = form.text("question", text.to_string());
        }

        debug!(
            url = %self.agent_url(),
            has_question = question.map(|t| !t.is_empty()).unwrap_or(false),
            "submitting advisory query"
        );

        let response = self
            .client
            .post(self.agent_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SessionError::Transport("request timed out".to_string())
                } else if e.is_connect() {
                    SessionError::Transport(format!("cannot connect to advisory backend: {}", e))
                } else {
                    SessionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Server(status.as_u16()));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| SessionError::Transport(format!("invalid response body: {}", e)))?;

        info!(status = status.as_u16(), "advisory query answered");

        Ok(raw)
    }
}
