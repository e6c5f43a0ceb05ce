//! Engagement analysis
//!
//! Distribution histogram, emotion frequencies, posture correlation, and
//! peak-hour ranking over the period's sessions.

use crate::rollup::{sessions_in_range, DateRange};
use crate::types::{
    EmotionFrequency, EngagementAnalysis, HistogramBand, PeakHour, PostureCorrelation,
    SessionRecord,
};
use std::collections::HashMap;

/// Fixed 20-point band labels, low to high
const BAND_LABELS: [&str; 5] = ["0-20", "20-40", "40-60", "60-80", "80-100"];

/// Emotions reported in the analysis
const TOP_EMOTION_LIMIT: usize = 6;

/// Hours reported in the peak-hour ranking
const PEAK_HOUR_LIMIT: usize = 5;

/// Analyze engagement across the period's sessions.
pub fn engagement_analysis(sessions: &[SessionRecord], range: &DateRange) -> EngagementAnalysis {
    let in_range = sessions_in_range(sessions, range);

    EngagementAnalysis {
        histogram: histogram(&in_range),
        top_emotions: top_emotions(&in_range),
        posture_correlation: posture_correlation(&in_range),
        peak_hours: peak_hours(&in_range),
    }
}

fn band_index(score: f64) -> usize {
    ((score / 20.0) as usize).min(BAND_LABELS.len() - 1)
}

/// All five bands are always present, even when empty.
fn histogram(sessions: &[&SessionRecord]) -> Vec<HistogramBand> {
    let mut counts = [0_u32; 5];
    for session in sessions {
        counts[band_index(session.analytics.engagement_score as f64)] += 1;
    }
    BAND_LABELS
        .iter()
        .zip(counts)
        .map(|(band, count)| HistogramBand {
            band: (*band).to_string(),
            count,
        })
        .collect()
}

/// Most frequent emotion tags, ties broken alphabetically.
fn top_emotions(sessions: &[&SessionRecord]) -> Vec<EmotionFrequency> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for session in sessions {
        for emotion in &session.emotions {
            *counts.entry(emotion.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<EmotionFrequency> = counts
        .into_iter()
        .map(|(emotion, count)| EmotionFrequency {
            emotion: emotion.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.emotion.cmp(&b.emotion)));
    ranked.truncate(TOP_EMOTION_LIMIT);
    ranked
}

/// Mean engagement per posture band, only bands with sessions, low to high.
fn posture_correlation(sessions: &[&SessionRecord]) -> Vec<PostureCorrelation> {
    let mut sums = [0.0_f64; 5];
    let mut counts = [0_u32; 5];
    for session in sessions {
        let idx = band_index(session.analytics.avg_posture_score);
        sums[idx] += session.analytics.engagement_score as f64;
        counts[idx] += 1;
    }

    BAND_LABELS
        .iter()
        .zip(sums.iter().zip(counts))
        .filter(|(_, (_, count))| *count > 0)
        .map(|(band, (sum, count))| PostureCorrelation {
            band: (*band).to_string(),
            avg_engagement: sum / count as f64,
            session_count: count,
        })
        .collect()
}

/// Hours ranked by mean engagement, ties broken by earlier hour.
fn peak_hours(sessions: &[&SessionRecord]) -> Vec<PeakHour> {
    use chrono::Timelike;

    let mut sums = [0.0_f64; 24];
    let mut counts = [0_u32; 24];
    for session in sessions {
        let hour = session.started_at.hour() as usize;
        sums[hour] += session.analytics.engagement_score as f64;
        counts[hour] += 1;
    }

    let mut ranked: Vec<PeakHour> = (0..24)
        .filter(|&h| counts[h] > 0)
        .map(|h| PeakHour {
            hour: h as u8,
            avg_engagement: sums[h] / counts[h] as f64,
            session_count: counts[h],
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.avg_engagement
            .partial_cmp(&a.avg_engagement)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.hour.cmp(&b.hour))
    });
    ranked.truncate(PEAK_HOUR_LIMIT);
    ranked
}
