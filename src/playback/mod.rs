mod orchestrator;
mod sink;

pub use orchestrator::{LogNavigator, Navigator, PlaybackOrchestrator};
pub use sink::{AudioSink, PlaybackError, RodioSink};
