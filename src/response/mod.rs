//! Normalization of raw advisory replies
//!
//! The backend's JSON payload is loosely structured: any key may be absent,
//! null, or of an unexpected type. `normalize` turns it into the canonical
//! `NormalizedResponse` with a two-tier resolution per field family:
//! structured data first, pattern extraction from the message text second,
//! and structured data always wins when both are present.

mod fallback;
mod model;

pub use model::{Continuation, NormalizedResponse, NutrientLevel, Soil, Temperature, Weather};

use serde_json::Value;

/// Normalize a raw backend payload
///
/// Pure and infallible: missing, malformed, or mismatched fields degrade to
/// absent or their documented defaults rather than failing the response.
pub fn normalize(raw: &Value) -> NormalizedResponse {
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let weather = structured_weather(raw).or_else(|| fallback_weather(&message));
    let soil = structured_soil(raw).or_else(|| fallback_soil(&message));

    let audio_url = raw
        .get("audio_url")
        .and_then(Value::as_str)
        .map(str::to_string);

    NormalizedResponse {
        message,
        weather,
        soil,
        audio_url,
        continuation: continuation(raw),
    }
}

/// Weather from the structured `weather` object, each subfield defaulted
/// independently
fn structured_weather(raw: &Value) -> Option<Weather> {
    let weather = raw.get("weather").filter(|v| v.is_object())?;

    Some(Weather {
        location: weather
            .pointer("/location/name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        condition: weather
            .pointer("/current/condition/text")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
        temperature: Temperature::Celsius(
            weather
                .pointer("/current/temp_c")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        ),
    })
}

fn fallback_weather(message: &str) -> Option<Weather> {
    fallback::weather_from_text(message)
}

/// Soil from the structured `soil` object
fn structured_soil(raw: &Value) -> Option<Soil> {
    let soil = raw.get("soil").filter(|v| v.is_object())?;

    let level = |key: &str| {
        soil.get(key)
            .and_then(Value::as_str)
            .map(NutrientLevel::from_text)
            .unwrap_or_default()
    };

    Some(Soil {
        moisture_percent: soil
            .get("moisture")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        ph: soil.get("ph").and_then(Value::as_f64).unwrap_or(7.0),
        nitrogen: level("nitrogen"),
        phosphorus: level("phosphorus"),
        potassium: level("potassium"),
    })
}

/// Fallback soil: only the moisture comes from the text, everything else
/// keeps the structured defaults once a soil entity is created at all
fn fallback_soil(message: &str) -> Option<Soil> {
    fallback::soil_moisture_from_text(message).map(|moisture| Soil {
        moisture_percent: moisture,
        ..Soil::default()
    })
}

/// Continuation only when `redirect` is truthy and `redirect_url` non-empty
fn continuation(raw: &Value) -> Option<Continuation> {
    if !raw.get("redirect").map(is_truthy).unwrap_or(false) {
        return None;
    }

    raw.get("redirect_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(|url| Continuation {
            redirect_url: url.to_string(),
        })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
