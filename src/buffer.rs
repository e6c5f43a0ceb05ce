//! Smoothing buffer
//!
//! Bounded, time-windowed sample history plus a periodically refreshed
//! smoothed snapshot. Samples may arrive at high or irregular frequency, but
//! observers never see display-level updates faster than the configured
//! refresh period; this is the anti-jitter contract for panels.
//!
//! Two histories are kept: a display window bounded to the most recent N
//! samples (charting, smoothing) and the full append-only history consumed by
//! [`crate::session::SessionAggregator`].

use crate::scorer::{self, CompositeScorer};
use crate::types::{ChartPoint, MetricSample, SmoothedSnapshot};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Default number of samples kept for display purposes
pub const DEFAULT_DISPLAY_CAPACITY: usize = 60;
/// Default refresh period for single-value smoothed metrics
pub const DEFAULT_VALUE_PERIOD_SEC: i64 = 3;
/// Default refresh period for chart points
pub const DEFAULT_CHART_PERIOD_SEC: i64 = 5;

/// Smoothing cadence and window configuration.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingConfig {
    /// Capacity of the display-bounded window
    pub display_capacity: usize,
    /// Minimum time between smoothed-value refreshes
    pub value_period: Duration,
    /// Minimum time between chart-point emissions
    pub chart_period: Duration,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            display_capacity: DEFAULT_DISPLAY_CAPACITY,
            value_period: Duration::seconds(DEFAULT_VALUE_PERIOD_SEC),
            chart_period: Duration::seconds(DEFAULT_CHART_PERIOD_SEC),
        }
    }
}

/// Bounded display window plus full history with period-gated smoothing.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    config: SmoothingConfig,
    /// Most recent samples for display (bounded)
    display: VecDeque<MetricSample>,
    /// Full session history (unbounded, append-only)
    history: Vec<MetricSample>,
    /// Last computed smoothed snapshot
    snapshot: SmoothedSnapshot,
    /// Chart series (bounded to display capacity)
    chart: VecDeque<ChartPoint>,
    last_value_refresh: DateTime<Utc>,
    last_chart_refresh: DateTime<Utc>,
}

impl SmoothingBuffer {
    /// Create a buffer anchored at `started_at`; the first refresh happens
    /// one full period later.
    pub fn new(config: SmoothingConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            config,
            display: VecDeque::with_capacity(config.display_capacity),
            history: Vec::new(),
            snapshot: SmoothedSnapshot::default(),
            chart: VecDeque::with_capacity(config.display_capacity),
            last_value_refresh: started_at,
            last_chart_refresh: started_at,
        }
    }

    /// Append a sample to both histories, evicting only from the display
    /// window. Out-of-order samples are dropped (and assert in dev builds);
    /// equal timestamps are allowed.
    pub fn push(&mut self, sample: MetricSample) {
        if let Some(last) = self.history.last() {
            if sample.timestamp < last.timestamp {
                debug_assert!(
                    false,
                    "non-monotonic sample timestamp: {} < {}",
                    sample.timestamp, last.timestamp
                );
                return;
            }
        }

        self.display.push_back(sample.clone());
        while self.display.len() > self.config.display_capacity {
            self.display.pop_front();
        }
        self.history.push(sample);
    }

    /// Refresh the smoothed snapshot and chart series if their periods have
    /// elapsed. Returns true when the smoothed snapshot was recomputed.
    ///
    /// Refresh cadence is independent of sample arrival rate: a thousand
    /// pushes inside one period still yield a single display-level update.
    pub fn maybe_refresh(&mut self, now: DateTime<Utc>) -> bool {
        let mut refreshed = false;

        if now - self.last_value_refresh >= self.config.value_period {
            self.snapshot = self.compute_snapshot();
            self.last_value_refresh = now;
            refreshed = true;
        }

        if now - self.last_chart_refresh >= self.config.chart_period {
            let window = self.display_window();
            self.chart.push_back(ChartPoint {
                timestamp: now,
                engagement_score: CompositeScorer::score(&window),
            });
            while self.chart.len() > self.config.display_capacity {
                self.chart.pop_front();
            }
            self.last_chart_refresh = now;
        }

        refreshed
    }

    /// Last computed smoothed snapshot. Zeroed defaults before the first
    /// refresh or on an empty history, never NaN.
    pub fn snapshot(&self) -> SmoothedSnapshot {
        self.snapshot
    }

    /// Chart points emitted so far (bounded).
    pub fn chart_points(&self) -> &VecDeque<ChartPoint> {
        &self.chart
    }

    /// Full session history.
    pub fn history(&self) -> &[MetricSample] {
        &self.history
    }

    /// Number of samples currently in the display window.
    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    /// Mean posture over the most recent `n` samples, if any.
    pub fn recent_posture_mean(&self, n: usize) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let start = self.history.len().saturating_sub(n);
        let recent = &self.history[start..];
        Some(recent.iter().map(|s| s.posture_score).sum::<f64>() / recent.len() as f64)
    }

    fn display_window(&self) -> Vec<MetricSample> {
        self.display.iter().cloned().collect()
    }

    fn compute_snapshot(&self) -> SmoothedSnapshot {
        let window = self.display_window();
        SmoothedSnapshot {
            engagement_score: CompositeScorer::score(&window),
            posture_score: scorer::avg_posture_score(&window).round().clamp(0.0, 100.0) as u8,
            blink_rate: scorer::avg_blink_rate(&window).round().max(0.0) as u32,
        }
    }
}
