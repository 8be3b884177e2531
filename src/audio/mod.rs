pub mod backend;
pub mod microphone;
pub mod wav;

pub use backend::{AudioChunk, CaptureBackend, CaptureConfig};
pub use microphone::MicrophoneBackend;
pub use wav::encode_wav;
