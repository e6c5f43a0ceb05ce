//! Session aggregation
//!
//! Reduces the full sample history plus session metadata into one
//! [`SessionAnalyticsSnapshot`]: engagement, attention rate, average blink
//! rate, distraction count, and wall-clock duration.

use crate::scorer::{self, CompositeScorer};
use crate::types::{MetricSample, SessionAnalyticsSnapshot};
use chrono::{DateTime, Utc};

/// Session aggregator
pub struct SessionAggregator;

impl SessionAggregator {
    /// Reduce a session's history to its analytics snapshot.
    ///
    /// Empty history gives the all-zero snapshot except `duration_seconds`,
    /// never NaN. Duration is wall-clock elapsed, independent of sample count
    /// or cadence; a `now` before `started_at` asserts in dev builds and
    /// clamps to 0 in release.
    pub fn aggregate(
        history: &[MetricSample],
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SessionAnalyticsSnapshot {
        debug_assert!(now >= started_at, "session end before start");
        let duration_seconds = (now - started_at).num_seconds().max(0) as u64;

        if history.is_empty() {
            return SessionAnalyticsSnapshot {
                duration_seconds,
                ..SessionAnalyticsSnapshot::default()
            };
        }

        SessionAnalyticsSnapshot {
            engagement_score: CompositeScorer::score(history),
            attention_rate: scorer::attention_rate(history).round() as u8,
            avg_posture_score: scorer::avg_posture_score(history),
            avg_blink_rate: scorer::avg_blink_rate(history).round() as u32,
            distraction_count: count_distractions(history),
            duration_seconds,
        }
    }
}

/// Count discrete phone-in-view occurrences as rising edges of `has_phone`.
///
/// A continuously held phone counts once; each separate appearance counts
/// again. The signal is assumed absent before the first sample.
fn count_distractions(history: &[MetricSample]) -> u32 {
    let mut count = 0;
    let mut previous = false;
    for sample in history {
        if sample.has_phone && !previous {
            count += 1;
        }
        previous = sample.has_phone;
    }
    count
}
