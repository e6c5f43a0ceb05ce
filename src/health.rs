//! Health classification
//!
//! Derives categorical eye-strain and fatigue levels plus an overall 0-100
//! health score from accumulated session metrics and elapsed duration.
//! Stateless and per-session: nothing here survives a session.

use crate::types::{HealthState, Level};

/// Accumulated session metrics fed to the classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierInput {
    /// Cumulative yawns this session
    pub yawn_count: u32,
    /// Cumulative head drops this session
    pub head_drops: u32,
    /// Cumulative micro-sleeps this session
    pub micro_sleeps: u32,
    /// Smoothed posture score (0-100)
    pub avg_posture_score: f64,
    /// Mean blink rate over the session (blinks per minute)
    pub avg_blink_rate: f64,
    /// Elapsed session duration in seconds
    pub duration_seconds: u64,
}

/// Health classifier
pub struct HealthClassifier;

impl HealthClassifier {
    /// Classify accumulated session metrics into a [`HealthState`].
    pub fn classify(input: &ClassifierInput) -> HealthState {
        let eye_strain = classify_eye_strain(input.avg_blink_rate, input.duration_seconds);
        let fatigue = classify_fatigue(input.yawn_count, input.head_drops, input.micro_sleeps);
        let health_score = compute_health_score(input, eye_strain, fatigue);

        HealthState {
            eye_strain,
            fatigue,
            health_score,
        }
    }
}

/// Eye strain risk compounds with both low blink rate and session length, so
/// the blink threshold tightens as duration grows.
fn classify_eye_strain(avg_blink_rate: f64, duration_seconds: u64) -> Level {
    let minutes = duration_seconds as f64 / 60.0;

    if (avg_blink_rate < 10.0 && minutes > 15.0) || (avg_blink_rate < 12.0 && minutes > 30.0) {
        Level::High
    } else if avg_blink_rate < 14.0 {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Any micro-sleep is an immediate hard trigger regardless of other counters.
fn classify_fatigue(yawn_count: u32, head_drops: u32, micro_sleeps: u32) -> Level {
    if micro_sleeps > 0 || yawn_count > 5 {
        Level::High
    } else if yawn_count > 2 || head_drops > 3 {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Start at 100 and apply independent, additive deductions per factor,
/// floored at 0.
fn compute_health_score(input: &ClassifierInput, eye_strain: Level, fatigue: Level) -> u8 {
    let mut deductions: u32 = 0;

    if input.avg_posture_score < 60.0 {
        deductions += 20;
    } else if input.avg_posture_score < 80.0 {
        deductions += 10;
    }

    deductions += match eye_strain {
        Level::High => 25,
        Level::Medium => 15,
        Level::Low => 0,
    };

    deductions += match fatigue {
        Level::High => 30,
        Level::Medium => 15,
        Level::Low => 0,
    };

    let minutes = input.duration_seconds as f64 / 60.0;
    if minutes > 90.0 {
        deductions += 20;
    } else if minutes > 60.0 {
        deductions += 10;
    }

    100u32.saturating_sub(deductions) as u8
}
