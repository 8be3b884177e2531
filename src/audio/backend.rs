use crate::error::Result;
use tokio::sync::mpsc;

/// A slice of captured audio (16-bit PCM, mono)
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Raw audio samples (i16 PCM)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Preferred sample rate (the device rate is used if it differs)
    pub sample_rate: u32,
    /// Capture channel count before downmix (output is always mono)
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Microphone capture backend trait
///
/// Implementations:
/// - `MicrophoneBackend`: cpal default input device
/// - test backends that replay scripted chunks
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio chunks in arrival
    /// order. Fails with `SessionError::MicAccess` when the device cannot be
    /// opened, in which case no capture is active.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>>;

    /// Stop capturing audio
    ///
    /// Closes the chunk channel; chunks already sent remain readable.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}
