//! Core types for the studypulse engine
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: validated samples, smoothed display values, health states, alerts,
//! per-session analytics, and multi-day rollup outputs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One validated, timestamped behavioral measurement.
///
/// Produced by [`crate::ingest`] from the raw records pushed by the sensing
/// collaborator. Immutable once created; counters (`yawn_count`, `head_drops`,
/// `micro_sleeps`) are cumulative for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    /// When the measurement was taken (UTC)
    pub timestamp: DateTime<Utc>,
    /// Whether gaze was on the screen
    pub looking_at_screen: bool,
    /// Posture quality (0-100)
    pub posture_score: f64,
    /// Blink rate (blinks per minute)
    pub blink_rate: f64,
    /// Whether a phone is in view
    pub has_phone: bool,
    /// Whether a face was detected
    pub face_detected: bool,
    /// Number of faces in view
    pub face_count: u32,
    /// Neck angle (degrees)
    pub neck_angle: f64,
    /// Back angle (degrees)
    pub back_angle: f64,
    /// Cumulative yawns this session
    pub yawn_count: u32,
    /// Cumulative head drops this session
    pub head_drops: u32,
    /// Cumulative micro-sleeps this session
    pub micro_sleeps: u32,
}

/// Display-facing metrics, refreshed on a fixed period rather than per sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothedSnapshot {
    /// Composite engagement score (0-100)
    pub engagement_score: u8,
    /// Smoothed posture score (0-100)
    pub posture_score: u8,
    /// Smoothed blink rate (blinks per minute)
    pub blink_rate: u32,
}

/// One chart-series point, emitted at most once per chart refresh period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartPoint {
    /// When the point was emitted
    pub timestamp: DateTime<Utc>,
    /// Engagement score over the display window at that time (0-100)
    pub engagement_score: u8,
}

/// Severity level for categorical health states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

/// Categorical health state derived from accumulated session metrics.
///
/// Ephemeral: recomputed whenever new samples or elapsed duration change,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    /// Eye strain risk level
    pub eye_strain: Level,
    /// Fatigue level
    pub fatigue: Level,
    /// Overall health score (0-100)
    pub health_score: u8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            eye_strain: Level::Low,
            fatigue: Level::Low,
            health_score: 100,
        }
    }
}

/// Stable alert identifier, one per rule.
///
/// Re-evaluating a rule replaces its alert rather than duplicating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    EyeStrain,
    Fatigue,
    Posture,
    LongSession,
    BreakReminder,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::EyeStrain => "eye-strain",
            AlertKind::Fatigue => "fatigue",
            AlertKind::Posture => "posture",
            AlertKind::LongSession => "long-session",
            AlertKind::BreakReminder => "break-reminder",
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

/// A threshold-triggered alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Stable per-rule identifier
    pub kind: AlertKind,
    /// Severity of the alert
    pub severity: AlertSeverity,
    /// Human-readable message
    pub message: String,
    /// Optional label for a suggested action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
}

/// Per-session analytics reduced from the full sample history.
///
/// Immutable once a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalyticsSnapshot {
    /// Composite engagement score over the whole session (0-100)
    pub engagement_score: u8,
    /// Percentage of samples with gaze on screen (0-100)
    pub attention_rate: u8,
    /// Mean posture score over all samples (0-100)
    pub avg_posture_score: f64,
    /// Mean blink rate, rounded (blinks per minute)
    pub avg_blink_rate: u32,
    /// Number of discrete phone-in-view occurrences (rising edges)
    pub distraction_count: u32,
    /// Wall-clock session duration in seconds
    pub duration_seconds: u64,
}

/// A completed session as stored by the storage collaborator and consumed by
/// period rollups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique session identifier
    pub session_id: Uuid,
    /// Session start time (UTC)
    pub started_at: DateTime<Utc>,
    /// Final session analytics
    pub analytics: SessionAnalyticsSnapshot,
    /// Emotion tags supplied by the sensing collaborator, if any
    #[serde(default)]
    pub emotions: Vec<String>,
}

/// One trend point per calendar day with at least one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Mean engagement score across the day's sessions
    pub avg_engagement: f64,
    /// Mean attention rate across the day's sessions
    pub avg_attention: f64,
    /// Mean posture score across the day's sessions
    pub avg_posture: f64,
    /// Mean blink rate across the day's sessions
    pub avg_blink_rate: f64,
    /// Number of sessions that day
    pub session_count: u32,
}

/// Direction of the session-length trend over the reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLengthTrend {
    Increasing,
    Stable,
    Decreasing,
}

/// Study patterns over a reporting period: time-of-week totals and streaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPatterns {
    /// Total study minutes per weekday (Monday first)
    pub minutes_by_weekday: [f64; 7],
    /// Total study minutes per hour of day (0-23, bucketed by session start)
    pub minutes_by_hour: [f64; 24],
    /// Consecutive study days ending at (or just before) today
    pub current_streak_days: u32,
    /// Longest run of consecutive study days anywhere in the range
    pub longest_streak_days: u32,
    /// Whether sessions are getting longer or shorter over the period
    pub session_length_trend: SessionLengthTrend,
}

/// One fixed engagement-score band of the distribution histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBand {
    /// Band label, e.g. "20-40"
    pub band: String,
    /// Number of sessions falling in the band
    pub count: u32,
}

/// Frequency of one emotion tag across the period's sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionFrequency {
    pub emotion: String,
    pub count: u32,
}

/// Average engagement for sessions whose mean posture fell in one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureCorrelation {
    /// Posture band label, e.g. "60-80"
    pub band: String,
    /// Mean engagement of sessions in the band
    pub avg_engagement: f64,
    /// Number of sessions in the band
    pub session_count: u32,
}

/// One hour-of-day bucket ranked by average engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Mean engagement of sessions starting in this hour
    pub avg_engagement: f64,
    /// Number of sessions starting in this hour
    pub session_count: u32,
}

/// Engagement distribution analysis over a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementAnalysis {
    /// Session counts in fixed 20-point engagement bands
    pub histogram: Vec<HistogramBand>,
    /// Up to six most frequent emotion tags
    pub top_emotions: Vec<EmotionFrequency>,
    /// Posture-band to average-engagement correlation table
    pub posture_correlation: Vec<PostureCorrelation>,
    /// Up to five hour-of-day buckets with the highest average engagement
    pub peak_hours: Vec<PeakHour>,
}

/// Caller-supplied productivity component sub-scores (each 0-100).
///
/// Component formulas are owned by the dashboard collaborator; the engine only
/// clamps, weights, and maps the result to a grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductivityComponents {
    pub consistency: f64,
    pub engagement: f64,
    pub health: f64,
}

/// Letter grade mapped from the overall productivity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Composite productivity score for a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductivityScore {
    /// Weighted overall score (0-100)
    pub overall: u8,
    /// Letter grade for the overall score
    pub grade: Grade,
    /// The component sub-scores the overall was computed from (clamped)
    pub components: ProductivityComponents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serialization() {
        let json = serde_json::to_string(&Level::Medium).unwrap();
        assert_eq!(json, "\"medium\"");

        let parsed: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Level::Medium);
    }

    #[test]
    fn test_alert_kind_serialization() {
        let json = serde_json::to_string(&AlertKind::EyeStrain).unwrap();
        assert_eq!(json, "\"eye-strain\"");
        assert_eq!(AlertKind::BreakReminder.as_str(), "break-reminder");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Low < Level::Medium);
        assert!(Level::Medium < Level::High);
    }

    #[test]
    fn test_session_record_deserialization() {
        let json = r#"{
            "session_id": "5f7f1b1e-19b5-4f32-8d37-1f0a6d8b4c11",
            "started_at": "2024-03-12T09:00:00Z",
            "analytics": {
                "engagement_score": 82,
                "attention_rate": 90,
                "avg_posture_score": 74.5,
                "avg_blink_rate": 18,
                "distraction_count": 2,
                "duration_seconds": 3600
            }
        }"#;

        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.analytics.engagement_score, 82);
        assert_eq!(record.analytics.duration_seconds, 3600);
        assert!(record.emotions.is_empty());
    }

    #[test]
    fn test_default_health_state() {
        let state = HealthState::default();
        assert_eq!(state.eye_strain, Level::Low);
        assert_eq!(state.fatigue, Level::Low);
        assert_eq!(state.health_score, 100);
    }
}
