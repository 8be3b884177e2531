use thiserror::Error;

/// Errors surfaced to the caller of a query session.
///
/// Every variant returns the session to `Idle`; none of them are retried
/// automatically. Playback failures are deliberately not represented here:
/// a blocked or failed playback is logged and swallowed inside the playback
/// orchestrator and the session continues as if there were no audio.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// Microphone permission was denied or no capture device is available
    #[error("microphone access error: {0}")]
    MicAccess(String),

    /// Transport-level failure during submission (DNS, connection reset, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The advisory backend answered with a non-2xx status
    #[error("server returned status {0}")]
    Server(u16),

    /// Local audio processing failed (chunk encoding)
    #[error("audio processing error: {0}")]
    AudioProcessing(String),
}

impl SessionError {
    /// Message suitable for direct display to the user
    pub fn user_message(&self) -> String {
        match self {
            SessionError::MicAccess(_) => {
                "Microphone access is required. Please allow microphone permission.".to_string()
            }
            SessionError::Transport(_) | SessionError::Server(_) => {
                "Could not reach the advisory service. Please try again.".to_string()
            }
            SessionError::AudioProcessing(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
        }
    }

    /// HTTP status code, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Server(status) => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
