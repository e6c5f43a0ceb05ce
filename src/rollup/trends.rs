//! Daily trend reduction
//!
//! Collapses the period's sessions into one point per calendar day with mean
//! engagement, attention, posture, and blink rate across that day's sessions.

use crate::rollup::{sessions_in_range, DateRange};
use crate::types::{SessionRecord, TrendPoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One trend point per calendar day with at least one session, in date order.
pub fn daily_trends(sessions: &[SessionRecord], range: &DateRange) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&SessionRecord>> = BTreeMap::new();
    for session in sessions_in_range(sessions, range) {
        by_day
            .entry(session.started_at.date_naive())
            .or_default()
            .push(session);
    }

    by_day
        .into_iter()
        .map(|(date, day_sessions)| {
            let n = day_sessions.len() as f64;
            TrendPoint {
                date,
                avg_engagement: day_sessions
                    .iter()
                    .map(|s| s.analytics.engagement_score as f64)
                    .sum::<f64>()
                    / n,
                avg_attention: day_sessions
                    .iter()
                    .map(|s| s.analytics.attention_rate as f64)
                    .sum::<f64>()
                    / n,
                avg_posture: day_sessions
                    .iter()
                    .map(|s| s.analytics.avg_posture_score)
                    .sum::<f64>()
                    / n,
                avg_blink_rate: day_sessions
                    .iter()
                    .map(|s| s.analytics.avg_blink_rate as f64)
                    .sum::<f64>()
                    / n,
                session_count: day_sessions.len() as u32,
            }
        })
        .collect()
}
