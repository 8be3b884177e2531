//! Pattern-based fallback extraction from the free-text advisory message
//!
//! This is a secondary, lower-confidence data source: it depends on the exact
//! backend phrasing and must never take priority over structured fields. The
//! patterns live here so they stay independently testable and swappable.

use super::model::{Temperature, Weather};
use regex::Regex;
use std::sync::OnceLock;

/// `Weather in <location> is <condition> with temperature <number>°C`
///
/// Case-sensitive; location and condition are non-greedy free text up to the
/// next literal marker, the temperature is a decimal with optional fraction.
fn weather_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Weather in (.+?) is (.+?) with temperature (\d+(?:\.\d+)?)°C")
            .expect("weather pattern is a valid regex")
    })
}

/// `soil moisture <digits>%`
fn soil_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"soil moisture (\d+)%").expect("soil pattern is a valid regex")
    })
}

/// Extract weather fields from the message text
///
/// The captures are used verbatim with no further defaulting; in particular
/// the temperature is kept as captured text rather than parsed, preserving
/// its original precision.
pub(super) fn weather_from_text(message: &str) -> Option<Weather> {
    let captures = weather_pattern().captures(message)?;

    Some(Weather {
        location: captures[1].to_string(),
        condition: captures[2].to_string(),
        temperature: Temperature::Text(captures[3].to_string()),
    })
}

/// Extract a soil moisture percentage from the message text
pub(super) fn soil_moisture_from_text(message: &str) -> Option<f64> {
    let captures = soil_pattern().captures(message)?;
    captures[1].parse().ok()
}
