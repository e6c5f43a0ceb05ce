//! Session engine orchestration
//!
//! [`SessionEngine`] is the per-session context object tying the pipeline
//! together: it owns the smoothing buffer, health state, and alert engine for
//! exactly one study session. Multiple sessions are independent engines with
//! no shared state.
//!
//! The host drives it cooperatively: `push_sample` once per arriving
//! measurement, `tick` on a periodic timer (1 s is plenty). Each call runs to
//! completion, so no locking is needed. Dropping the engine (or calling
//! [`SessionEngine::finish`]) is the timer teardown; nothing keeps running
//! afterwards.

use crate::alerts::{AlertContext, AlertEngine, POSTURE_ALERT_WINDOW};
use crate::buffer::{SmoothingBuffer, SmoothingConfig};
use crate::clock::{Clock, SystemClock};
use crate::health::{ClassifierInput, HealthClassifier};
use crate::ingest::{self, RawSample};
use crate::scorer;
use crate::session::SessionAggregator;
use crate::types::{
    Alert, AlertKind, ChartPoint, HealthState, MetricSample, SessionAnalyticsSnapshot,
    SessionRecord, SmoothedSnapshot,
};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

/// Per-session pipeline state: ingest, smoothing, health, alerts.
pub struct SessionEngine {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    clock: Box<dyn Clock>,
    buffer: SmoothingBuffer,
    alerts: AlertEngine,
    health: HealthState,
    emotions: Vec<String>,
}

impl SessionEngine {
    /// Start a session on the system clock with default smoothing cadence.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock), SmoothingConfig::default())
    }

    /// Start a session on an injected clock, for deterministic tests or
    /// replay.
    pub fn with_clock(clock: Box<dyn Clock>, config: SmoothingConfig) -> Self {
        let started_at = clock.now();
        Self {
            session_id: Uuid::new_v4(),
            started_at,
            buffer: SmoothingBuffer::new(config, started_at),
            alerts: AlertEngine::new(),
            health: HealthState::default(),
            emotions: Vec::new(),
            clock,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Ingest one canonical sample. Pure in-memory append; display values
    /// only move on the next elapsed smoothing period.
    pub fn push_sample(&mut self, sample: MetricSample) {
        self.buffer.push(sample);
    }

    /// Normalize and ingest one raw record from the sensing collaborator.
    pub fn push_raw(&mut self, raw: &RawSample) {
        let sample = ingest::normalize(raw, self.clock.now());
        self.push_sample(sample);
    }

    /// Periodic driver: refresh smoothing, reclassify health, re-evaluate
    /// alerts. Intended to be called about once per second.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.buffer.maybe_refresh(now);

        let duration_seconds = self.elapsed_seconds(now);
        let history = self.buffer.history();

        // No measurements yet: keep the neutral health state rather than
        // reading a zero blink rate as strain
        if let Some(latest) = history.last() {
            let input = ClassifierInput {
                yawn_count: latest.yawn_count,
                head_drops: latest.head_drops,
                micro_sleeps: latest.micro_sleeps,
                avg_posture_score: self.buffer.snapshot().posture_score as f64,
                avg_blink_rate: scorer::avg_blink_rate(history),
                duration_seconds,
            };
            self.health = HealthClassifier::classify(&input);
        }

        let ctx = AlertContext {
            health: self.health,
            recent_posture: self.buffer.recent_posture_mean(POSTURE_ALERT_WINDOW),
            duration_seconds,
        };
        self.alerts.evaluate(&ctx);
    }

    fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        debug_assert!(now >= self.started_at, "clock moved before session start");
        (now - self.started_at).num_seconds().max(0) as u64
    }

    /// Latest smoothed display values.
    pub fn smoothed(&self) -> SmoothedSnapshot {
        self.buffer.snapshot()
    }

    /// Chart series emitted so far.
    pub fn chart_points(&self) -> &VecDeque<ChartPoint> {
        self.buffer.chart_points()
    }

    /// Latest health classification.
    pub fn health(&self) -> HealthState {
        self.health
    }

    /// Currently active alerts.
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.alerts.active()
    }

    /// Dismiss an alert; it stays dismissed until its condition clears and
    /// re-fires.
    pub fn dismiss_alert(&mut self, kind: AlertKind) {
        self.alerts.dismiss(kind);
    }

    /// Attach an emotion tag reported by the sensing collaborator.
    pub fn record_emotion(&mut self, tag: impl Into<String>) {
        self.emotions.push(tag.into());
    }

    /// In-progress analytics over the history so far.
    pub fn analytics(&self) -> SessionAnalyticsSnapshot {
        SessionAggregator::aggregate(self.buffer.history(), self.started_at, self.clock.now())
    }

    /// End the session, consuming the engine and producing the record the
    /// storage collaborator persists.
    pub fn finish(self) -> SessionRecord {
        let analytics =
            SessionAggregator::aggregate(self.buffer.history(), self.started_at, self.clock.now());
        SessionRecord {
            session_id: self.session_id,
            started_at: self.started_at,
            analytics,
            emotions: self.emotions,
        }
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}
