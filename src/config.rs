use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub audio: AudioSettings,
}

/// Advisory backend endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Origin of the advisory backend (scheme + host + port)
    pub origin: String,

    /// Path of the agent endpoint, joined onto the origin
    #[serde(default = "default_agent_path")]
    pub agent_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    /// Capture sample rate in Hz
    pub sample_rate: u32,

    /// Number of capture channels (1 = mono)
    pub channels: u16,
}

fn default_agent_path() -> String {
    "/agent".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8000".to_string(),
            agent_path: default_agent_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1, // Mono
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
