use serde::Serialize;

/// Canonical advisory reply, the only model exposed to the UI and playback
/// layers. Every field degrades to absent or a documented default; a
/// normalized response is never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct NormalizedResponse {
    /// Free-text guidance (may be empty)
    pub message: String,

    /// Structured or fallback-extracted weather data
    pub weather: Option<Weather>,

    /// Structured or fallback-extracted soil data
    pub soil: Option<Soil>,

    /// Path to synthesized speech audio, relative to the backend origin
    pub audio_url: Option<String>,

    /// Post-playback navigation continuation
    pub continuation: Option<Continuation>,
}

/// Weather report for the queried location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub location: String,
    pub condition: String,
    pub temperature: Temperature,
}

/// Temperature in degrees Celsius
///
/// The structured path yields a number; fallback extraction keeps the
/// captured text verbatim so its original precision survives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Temperature {
    Celsius(f64),
    Text(String),
}

impl Temperature {
    /// Numeric value in degrees Celsius, when one can be read
    pub fn as_celsius(&self) -> Option<f64> {
        match self {
            Temperature::Celsius(v) => Some(*v),
            Temperature::Text(t) => t.parse().ok(),
        }
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Temperature::Celsius(v) => write!(f, "{}", v),
            Temperature::Text(t) => f.write_str(t),
        }
    }
}

/// Soil report for the queried field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Soil {
    /// Moisture percentage (0-100)
    pub moisture_percent: f64,
    pub ph: f64,
    pub nitrogen: NutrientLevel,
    pub phosphorus: NutrientLevel,
    pub potassium: NutrientLevel,
}

impl Default for Soil {
    fn default() -> Self {
        Self {
            moisture_percent: 0.0,
            ph: 7.0,
            nitrogen: NutrientLevel::Medium,
            phosphorus: NutrientLevel::Medium,
            potassium: NutrientLevel::Medium,
        }
    }
}

/// Qualitative nutrient level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl NutrientLevel {
    /// Parse a backend-provided level, defaulting unknown text to `Medium`
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "low" => NutrientLevel::Low,
            "high" => NutrientLevel::High,
            _ => NutrientLevel::Medium,
        }
    }
}

/// Action deferred until audio playback completes or is confirmed blocked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Continuation {
    pub redirect_url: String,
}
