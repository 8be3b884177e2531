pub mod audio;
pub mod client;
pub mod config;
pub mod error;
pub mod playback;
pub mod recording;
pub mod response;
pub mod session;

pub use audio::{AudioChunk, CaptureBackend, CaptureConfig, MicrophoneBackend};
pub use client::SubmissionClient;
pub use config::{AudioSettings, BackendConfig, Config};
pub use error::SessionError;
pub use playback::{AudioSink, LogNavigator, Navigator, PlaybackError, PlaybackOrchestrator, RodioSink};
pub use recording::{RecordedAudio, RecorderState, RecordingController};
pub use response::{
    normalize, Continuation, NormalizedResponse, NutrientLevel, Soil, Temperature, Weather,
};
pub use session::SessionController;
