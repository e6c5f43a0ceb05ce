//! Composite engagement scoring
//!
//! Pure functions mapping a window of samples to a single 0-100 engagement
//! score: 50% attention, 30% posture, 20% blink-rate compliance.

use crate::types::MetricSample;

/// Weight of the attention rate in the composite score
const ATTENTION_WEIGHT: f64 = 0.5;
/// Weight of the mean posture score in the composite score
const POSTURE_WEIGHT: f64 = 0.3;
/// Weight of blink-rate compliance in the composite score
const BLINK_WEIGHT: f64 = 0.2;

/// Lower bound of the healthy blink range (blinks per minute)
const BLINK_IDEAL_MIN: f64 = 15.0;
/// Upper bound of the healthy blink range (blinks per minute)
const BLINK_IDEAL_MAX: f64 = 25.0;
/// Distance from the healthy range at which compliance reaches zero
const BLINK_PENALTY_RANGE: f64 = 50.0;

/// Composite engagement scorer
pub struct CompositeScorer;

impl CompositeScorer {
    /// Score a window of samples.
    ///
    /// Formula: `round(attention_rate * 0.5 + avg_posture * 0.3 +
    /// blink_compliance * 0.2)`, clamped to 0-100. An empty window scores 0.
    pub fn score(window: &[MetricSample]) -> u8 {
        if window.is_empty() {
            return 0;
        }

        let engagement = attention_rate(window) * ATTENTION_WEIGHT
            + avg_posture_score(window) * POSTURE_WEIGHT
            + blink_compliance(avg_blink_rate(window)) * BLINK_WEIGHT;

        engagement.round().clamp(0.0, 100.0) as u8
    }
}

/// Percentage of samples with gaze on screen (0-100). Empty window gives 0.
pub fn attention_rate(window: &[MetricSample]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let focused = window.iter().filter(|s| s.looking_at_screen).count();
    (focused as f64 / window.len() as f64) * 100.0
}

/// Arithmetic mean of posture scores over the window (0-100).
///
/// Samples without posture data carry a score of 0 from ingest and are
/// included, pulling the mean toward 0 rather than being excluded.
pub fn avg_posture_score(window: &[MetricSample]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|s| s.posture_score).sum::<f64>() / window.len() as f64
}

/// Mean blink rate over the window (blinks per minute). Empty window gives 0.
pub fn avg_blink_rate(window: &[MetricSample]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|s| s.blink_rate).sum::<f64>() / window.len() as f64
}

/// Blink-rate compliance score (0-100).
///
/// 100 inside the healthy 15-25 BPM range; outside, the score decays linearly
/// with the distance to the nearest bound and reaches 0 at 50 BPM away:
/// `100 * (1 - min(distance / 50, 1))`. Too-low (eye strain) and too-high
/// (erratic blinking or detection noise) rates are penalized identically.
pub fn blink_compliance(avg_bpm: f64) -> f64 {
    let distance = if avg_bpm < BLINK_IDEAL_MIN {
        BLINK_IDEAL_MIN - avg_bpm
    } else if avg_bpm > BLINK_IDEAL_MAX {
        avg_bpm - BLINK_IDEAL_MAX
    } else {
        return 100.0;
    };

    let penalty = (distance / BLINK_PENALTY_RANGE).min(1.0);
    100.0 * (1.0 - penalty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_sample(looking: bool, posture: f64, blink: f64) -> MetricSample {
        MetricSample {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap(),
            looking_at_screen: looking,
            posture_score: posture,
            blink_rate: blink,
            has_phone: false,
            face_detected: true,
            face_count: 1,
            neck_angle: 0.0,
            back_angle: 0.0,
            yawn_count: 0,
            head_drops: 0,
            micro_sleeps: 0,
        }
    }

    #[test]
    fn test_perfect_window_scores_100() {
        let window: Vec<MetricSample> = (0..10).map(|_| make_sample(true, 100.0, 20.0)).collect();
        assert_eq!(CompositeScorer::score(&window), 100);
    }

    #[test]
    fn test_empty_window_scores_zero() {
        assert_eq!(CompositeScorer::score(&[]), 0);
    }

    #[test]
    fn test_score_stays_in_range() {
        let window: Vec<MetricSample> = (0..20)
            .map(|i| make_sample(i % 3 == 0, (i as f64) * 5.0, (i as f64) * 4.0))
            .collect();
        let score = CompositeScorer::score(&window);
        assert!(score <= 100);
    }

    #[test]
    fn test_blink_compliance_in_range() {
        assert_eq!(blink_compliance(15.0), 100.0);
        assert_eq!(blink_compliance(20.0), 100.0);
        assert_eq!(blink_compliance(25.0), 100.0);
    }

    #[test]
    fn test_blink_compliance_zero_bpm() {
        // Distance 15 from the lower bound: 100 * (1 - 15/50) = 70
        assert!((blink_compliance(0.0) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_blink_compliance_high_bpm() {
        // Distance 45 from the upper bound: 100 * (1 - 45/50) = 10
        assert!((blink_compliance(70.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_blink_compliance_floors_at_zero() {
        assert_eq!(blink_compliance(200.0), 0.0);
    }

    #[test]
    fn test_attention_rate() {
        let window = vec![
            make_sample(true, 80.0, 18.0),
            make_sample(false, 80.0, 18.0),
            make_sample(true, 80.0, 18.0),
            make_sample(true, 80.0, 18.0),
        ];
        assert!((attention_rate(&window) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_posture_pulls_average_down() {
        // A sample with no posture data arrives as 0, not excluded
        let window = vec![make_sample(true, 100.0, 20.0), make_sample(true, 0.0, 20.0)];
        assert!((avg_posture_score(&window) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_contributions() {
        // All focused, zero posture, ideal blink:
        // 100*0.5 + 0*0.3 + 100*0.2 = 70
        let window: Vec<MetricSample> = (0..5).map(|_| make_sample(true, 0.0, 20.0)).collect();
        assert_eq!(CompositeScorer::score(&window), 70);
    }
}
