//! End-to-end query session management
//!
//! This module provides the `SessionController` that composes:
//! - Recording lifecycle (microphone capture and finalization)
//! - Submission to the advisory backend
//! - Response normalization
//! - Audio playback and the post-playback continuation

mod controller;

pub use controller::SessionController;
