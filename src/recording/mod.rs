//! Recording lifecycle management
//!
//! This module provides the `RecordingController` that owns:
//! - The `Idle -> Recording -> Finalizing -> Idle` state machine
//! - The session-exclusive chunk buffer (cleared at start, sealed at stop)
//! - Finalization of accumulated chunks into a single WAV artifact

mod controller;

pub use controller::{RecordedAudio, RecorderState, RecordingController};
