//! Period rollups
//!
//! Pure, order-preserving reductions of many completed sessions over a
//! reporting period: daily trends, study patterns, engagement distribution
//! analysis, and the productivity composite. The storage collaborator fetches
//! the session records; everything here takes already-resolved input and
//! holds no state past the call, so identical input always yields identical
//! output.

pub mod engagement;
pub mod patterns;
pub mod productivity;
pub mod trends;

pub use engagement::engagement_analysis;
pub use patterns::study_patterns;
pub use productivity::ProductivityScorer;
pub use trends::daily_trends;

use crate::error::EngineError;
use crate::types::SessionRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range for rollup queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Sessions whose start date falls inside the range, in input order.
pub(crate) fn sessions_in_range<'a>(
    sessions: &'a [SessionRecord],
    range: &DateRange,
) -> Vec<&'a SessionRecord> {
    sessions
        .iter()
        .filter(|s| range.contains(s.started_at.date_naive()))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testutil::{date, make_session};
    use super::*;

    #[test]
    fn test_invalid_range_rejected() {
        let result = DateRange::new(date(2024, 3, 10), date(2024, 3, 1));
        assert!(result.is_err());
    }

    #[test]
    fn test_range_contains_bounds() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 10)).unwrap();
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 10)));
        assert!(!range.contains(date(2024, 3, 11)));
    }

    #[test]
    fn test_sessions_filtered_by_range() {
        let sessions = vec![
            make_session(2024, 2, 28, 10, 70, 30),
            make_session(2024, 3, 5, 10, 80, 30),
            make_session(2024, 3, 12, 10, 90, 30),
        ];
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 10)).unwrap();

        let filtered = sessions_in_range(&sessions, &range);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].analytics.engagement_score, 80);
    }
}
