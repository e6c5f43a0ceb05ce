//! Sample ingest
//!
//! Parses and normalizes one raw measurement from the sensing collaborator
//! into a canonical [`MetricSample`]. Ingest is deliberately liberal: missing
//! or non-finite numeric fields default to zero, missing booleans to false,
//! and out-of-range values are clamped, so one bad sample never takes down
//! the pipeline. Malformed JSON is the only rejection.

use crate::error::EngineError;
use crate::types::MetricSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Loosely-shaped sample record as emitted by the sensing collaborator.
///
/// Every field is optional; numeric counters arrive as floats so that a
/// negative or fractional value degrades to a default instead of rejecting
/// the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub looking_at_screen: Option<bool>,
    pub posture_score: Option<f64>,
    pub blink_rate: Option<f64>,
    pub has_phone: Option<bool>,
    pub face_detected: Option<bool>,
    pub face_count: Option<f64>,
    pub neck_angle: Option<f64>,
    pub back_angle: Option<f64>,
    pub yawn_count: Option<f64>,
    pub head_drops: Option<f64>,
    pub micro_sleeps: Option<f64>,
}

/// Normalize a raw record into a canonical sample.
///
/// `now` is used when the record carries no timestamp. Never fails.
pub fn normalize(raw: &RawSample, now: DateTime<Utc>) -> MetricSample {
    MetricSample {
        timestamp: raw.timestamp.unwrap_or(now),
        looking_at_screen: raw.looking_at_screen.unwrap_or(false),
        posture_score: sanitize(raw.posture_score).clamp(0.0, 100.0),
        blink_rate: sanitize(raw.blink_rate),
        has_phone: raw.has_phone.unwrap_or(false),
        face_detected: raw.face_detected.unwrap_or(false),
        face_count: sanitize_count(raw.face_count),
        neck_angle: finite_or_zero(raw.neck_angle),
        back_angle: finite_or_zero(raw.back_angle),
        yawn_count: sanitize_count(raw.yawn_count),
        head_drops: sanitize_count(raw.head_drops),
        micro_sleeps: sanitize_count(raw.micro_sleeps),
    }
}

/// Parse a JSON sample record and normalize it.
pub fn parse_sample(json: &str, now: DateTime<Utc>) -> Result<MetricSample, EngineError> {
    let raw: RawSample = serde_json::from_str(json)
        .map_err(|e| EngineError::ParseError(format!("Failed to parse sample record: {}", e)))?;
    Ok(normalize(&raw, now))
}

/// Non-negative finite value, defaulting to 0.
fn sanitize(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Finite value allowed to be negative (angles), defaulting to 0.
fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Non-negative integer counter, defaulting to 0.
fn sanitize_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u32,
        _ => 0,
    }
}
