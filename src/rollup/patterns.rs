//! Study pattern extraction
//!
//! Time-of-week and time-of-day minute totals, study-day streaks, and the
//! direction of the session-length trend over the reporting period.

use crate::rollup::{sessions_in_range, DateRange};
use crate::types::{SessionLengthTrend, SessionRecord, StudyPatterns};
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::BTreeSet;

/// Minimum sessions before a length trend is called anything but stable
const TREND_MIN_SESSIONS: usize = 4;

/// Relative change in mean duration needed to call the trend a direction
const TREND_THRESHOLD: f64 = 0.10;

/// Extract study patterns from the period's sessions.
///
/// `today` anchors the current streak: a streak ending yesterday still counts
/// as current when today has no session yet.
pub fn study_patterns(
    sessions: &[SessionRecord],
    range: &DateRange,
    today: NaiveDate,
) -> StudyPatterns {
    let mut in_range = sessions_in_range(sessions, range);
    in_range.sort_by_key(|s| s.started_at);

    let mut minutes_by_weekday = [0.0_f64; 7];
    let mut minutes_by_hour = [0.0_f64; 24];
    let mut study_days: BTreeSet<NaiveDate> = BTreeSet::new();

    for session in &in_range {
        let minutes = session.analytics.duration_seconds as f64 / 60.0;
        let weekday = session.started_at.weekday().num_days_from_monday() as usize;
        let hour = session.started_at.hour() as usize;
        minutes_by_weekday[weekday] += minutes;
        minutes_by_hour[hour] += minutes;
        study_days.insert(session.started_at.date_naive());
    }

    let (current_streak_days, longest_streak_days) = streaks(&study_days, today);

    StudyPatterns {
        minutes_by_weekday,
        minutes_by_hour,
        current_streak_days,
        longest_streak_days,
        session_length_trend: session_length_trend(&in_range),
    }
}

/// Current and longest runs of consecutive calendar study days.
fn streaks(study_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> (u32, u32) {
    let mut longest = 0_u32;
    let mut run = 0_u32;
    let mut prev: Option<NaiveDate> = None;

    for &day in study_days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    // The run ending on the most recent study day is current if that day is
    // today or yesterday.
    let current = match prev {
        Some(last) if today.signed_duration_since(last).num_days() <= 1 => run,
        _ => 0,
    };

    (current, longest)
}

/// Compare mean durations of the chronological first and second halves.
fn session_length_trend(sessions: &[&SessionRecord]) -> SessionLengthTrend {
    if sessions.len() < TREND_MIN_SESSIONS {
        return SessionLengthTrend::Stable;
    }

    let mid = sessions.len() / 2;
    let mean = |slice: &[&SessionRecord]| {
        slice
            .iter()
            .map(|s| s.analytics.duration_seconds as f64)
            .sum::<f64>()
            / slice.len() as f64
    };
    let first = mean(&sessions[..mid]);
    let second = mean(&sessions[mid..]);

    if first <= 0.0 {
        return SessionLengthTrend::Stable;
    }

    let change = (second - first) / first;
    if change > TREND_THRESHOLD {
        SessionLengthTrend::Increasing
    } else if change < -TREND_THRESHOLD {
        SessionLengthTrend::Decreasing
    } else {
        SessionLengthTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollup::testutil::{date, make_session};
    use pretty_assertions::assert_eq;

    fn march_range() -> DateRange {
        DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap()
    }

    #[test]
    fn test_empty_sessions() {
        let patterns = study_patterns(&[], &march_range(), date(2024, 3, 15));
        assert_eq!(patterns.minutes_by_weekday, [0.0; 7]);
        assert_eq!(patterns.minutes_by_hour, [0.0; 24]);
        assert_eq!(patterns.current_streak_days, 0);
        assert_eq!(patterns.longest_streak_days, 0);
        assert_eq!(patterns.session_length_trend, SessionLengthTrend::Stable);
    }

    #[test]
    fn test_minutes_bucketed_by_weekday_and_hour() {
        // 2024-03-04 is a Monday.
        let sessions = vec![
            make_session(2024, 3, 4, 9, 70, 30),
            make_session(2024, 3, 4, 9, 70, 15),
            make_session(2024, 3, 5, 14, 70, 45),
        ];
        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 5));

        assert_eq!(patterns.minutes_by_weekday[0], 45.0);
        assert_eq!(patterns.minutes_by_weekday[1], 45.0);
        assert_eq!(patterns.minutes_by_hour[9], 45.0);
        assert_eq!(patterns.minutes_by_hour[14], 45.0);
    }

    #[test]
    fn test_streak_with_gap() {
        // Study days 1, 2, 3, 5, 6, 7; today is the 7th.
        let sessions: Vec<_> = [1, 2, 3, 5, 6, 7]
            .iter()
            .map(|&d| make_session(2024, 3, d, 9, 70, 30))
            .collect();
        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 7));

        assert_eq!(patterns.current_streak_days, 3);
        assert_eq!(patterns.longest_streak_days, 3);
    }

    #[test]
    fn test_streak_survives_one_sessionless_today() {
        let sessions: Vec<_> = [10, 11, 12]
            .iter()
            .map(|&d| make_session(2024, 3, d, 9, 70, 30))
            .collect();

        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 13));
        assert_eq!(patterns.current_streak_days, 3);

        // Two days without a session breaks the streak.
        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 14));
        assert_eq!(patterns.current_streak_days, 0);
        assert_eq!(patterns.longest_streak_days, 3);
    }

    #[test]
    fn test_multiple_sessions_one_day_count_once_for_streaks() {
        let sessions = vec![
            make_session(2024, 3, 10, 9, 70, 30),
            make_session(2024, 3, 10, 15, 70, 30),
            make_session(2024, 3, 11, 9, 70, 30),
        ];
        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 11));
        assert_eq!(patterns.current_streak_days, 2);
        assert_eq!(patterns.longest_streak_days, 2);
    }

    #[test]
    fn test_trend_increasing() {
        let sessions = vec![
            make_session(2024, 3, 1, 9, 70, 20),
            make_session(2024, 3, 2, 9, 70, 20),
            make_session(2024, 3, 3, 9, 70, 40),
            make_session(2024, 3, 4, 9, 70, 40),
        ];
        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 4));
        assert_eq!(
            patterns.session_length_trend,
            SessionLengthTrend::Increasing
        );
    }

    #[test]
    fn test_trend_decreasing() {
        let sessions = vec![
            make_session(2024, 3, 1, 9, 70, 60),
            make_session(2024, 3, 2, 9, 70, 60),
            make_session(2024, 3, 3, 9, 70, 25),
            make_session(2024, 3, 4, 9, 70, 25),
        ];
        let patterns = study_patterns(&sessions, &march_range(), date(2024, 3, 4));
        assert_eq!(
            patterns.session_length_trend,
            SessionLengthTrend::Decreasing
        );
    }

    #[test]
    fn test_trend_stable_under_threshold_or_few_sessions() {
        let few = vec![
            make_session(2024, 3, 1, 9, 70, 10),
            make_session(2024, 3, 2, 9, 70, 90),
        ];
        let patterns = study_patterns(&few, &march_range(), date(2024, 3, 2));
        assert_eq!(patterns.session_length_trend, SessionLengthTrend::Stable);

        let flat = vec![
            make_session(2024, 3, 1, 9, 70, 30),
            make_session(2024, 3, 2, 9, 70, 31),
            make_session(2024, 3, 3, 9, 70, 30),
            make_session(2024, 3, 4, 9, 70, 32),
        ];
        let patterns = study_patterns(&flat, &march_range(), date(2024, 3, 4));
        assert_eq!(patterns.session_length_trend, SessionLengthTrend::Stable);
    }
}
