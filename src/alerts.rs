//! Alert engine
//!
//! Stateful rule evaluator turning classifier output and duration thresholds
//! into a de-duplicated set of active alerts. Each rule owns a stable
//! [`AlertKind`], so re-evaluation replaces rather than duplicates. Dismissal
//! is latched: a dismissed alert stays gone while its condition holds
//! continuously true and re-arms only after the condition clears.
//!
//! A separate 20-20-20 break reminder fires once per 20 minutes of elapsed
//! study time, keyed to the boundary index so polling drift cannot double-fire
//! or skip a boundary.

use crate::types::{Alert, AlertKind, AlertSeverity, HealthState, Level};
use std::collections::{BTreeMap, BTreeSet};

/// Session duration past which the long-session alert fires (90 minutes)
pub const LONG_SESSION_THRESHOLD_SEC: u64 = 5400;
/// Mean posture over the recent window below which the posture alert fires
pub const POSTURE_ALERT_THRESHOLD: f64 = 50.0;
/// Number of recent posture samples averaged for the posture alert
pub const POSTURE_ALERT_WINDOW: usize = 5;
/// Break reminder cadence (20 minutes)
pub const BREAK_REMINDER_INTERVAL_SEC: u64 = 1200;

/// Inputs for one alert evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct AlertContext {
    /// Latest classifier output
    pub health: HealthState,
    /// Mean posture over the last [`POSTURE_ALERT_WINDOW`] samples, if any
    pub recent_posture: Option<f64>,
    /// Elapsed session duration in seconds
    pub duration_seconds: u64,
}

/// Stateful, per-session alert evaluator.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    active: BTreeMap<AlertKind, Alert>,
    dismissed: BTreeSet<AlertKind>,
    /// Index of the last 20-minute boundary a reminder was issued for
    last_break_boundary: u64,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate every rule against the current context and return the
    /// active alert set.
    pub fn evaluate(&mut self, ctx: &AlertContext) -> Vec<Alert> {
        self.apply_condition(AlertKind::EyeStrain, ctx.health.eye_strain == Level::High);
        self.apply_condition(AlertKind::Fatigue, ctx.health.fatigue == Level::High);
        self.apply_condition(
            AlertKind::Posture,
            ctx.recent_posture
                .map_or(false, |p| p < POSTURE_ALERT_THRESHOLD),
        );
        self.apply_condition(
            AlertKind::LongSession,
            ctx.duration_seconds > LONG_SESSION_THRESHOLD_SEC,
        );

        self.evaluate_break_reminder(ctx.duration_seconds);

        self.active()
    }

    /// Dismiss an alert by id. It stays dismissed until its condition clears
    /// and fires again.
    pub fn dismiss(&mut self, kind: AlertKind) {
        if self.active.remove(&kind).is_some() {
            self.dismissed.insert(kind);
        }
    }

    /// Currently active alerts, ordered by kind.
    pub fn active(&self) -> Vec<Alert> {
        self.active.values().cloned().collect()
    }

    fn apply_condition(&mut self, kind: AlertKind, condition: bool) {
        if condition {
            if !self.dismissed.contains(&kind) {
                self.active.entry(kind).or_insert_with(|| build_alert(kind));
            }
        } else {
            // Condition cleared: drop the alert and reset the dismissal latch
            self.active.remove(&kind);
            self.dismissed.remove(&kind);
        }
    }

    fn evaluate_break_reminder(&mut self, duration_seconds: u64) {
        let boundary = duration_seconds / BREAK_REMINDER_INTERVAL_SEC;
        if boundary > self.last_break_boundary {
            self.last_break_boundary = boundary;
            // A new boundary re-arms the reminder even if a prior one was
            // dismissed
            self.dismissed.remove(&AlertKind::BreakReminder);
            self.active
                .insert(AlertKind::BreakReminder, build_alert(AlertKind::BreakReminder));
        }
    }
}

fn build_alert(kind: AlertKind) -> Alert {
    match kind {
        AlertKind::EyeStrain => Alert {
            kind,
            severity: AlertSeverity::Danger,
            message: "Your blink rate has been very low. Your eyes may be strained.".to_string(),
            action_label: Some("Rest your eyes".to_string()),
        },
        AlertKind::Fatigue => Alert {
            kind,
            severity: AlertSeverity::Danger,
            message: "Signs of fatigue detected. Consider taking a longer break.".to_string(),
            action_label: Some("Take a break".to_string()),
        },
        AlertKind::Posture => Alert {
            kind,
            severity: AlertSeverity::Warning,
            message: "Your posture has been poor for a while. Sit upright and relax your shoulders."
                .to_string(),
            action_label: None,
        },
        AlertKind::LongSession => Alert {
            kind,
            severity: AlertSeverity::Warning,
            message: "You have been studying for over 90 minutes without a break.".to_string(),
            action_label: Some("Take a break".to_string()),
        },
        AlertKind::BreakReminder => Alert {
            kind,
            severity: AlertSeverity::Info,
            message: "20 minutes of study. Look at something 20 feet away for 20 seconds."
                .to_string(),
            action_label: Some("Start eye break".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    fn healthy() -> HealthState {
        HealthState::default()
    }

    fn strained() -> HealthState {
        HealthState {
            eye_strain: Level::High,
            ..HealthState::default()
        }
    }

    fn ctx(health: HealthState, recent_posture: Option<f64>, duration: u64) -> AlertContext {
        AlertContext {
            health,
            recent_posture,
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_repeated_evaluation_does_not_duplicate() {
        let mut engine = AlertEngine::new();

        let alerts = engine.evaluate(&ctx(strained(), Some(80.0), 60));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::EyeStrain);

        let alerts = engine.evaluate(&ctx(strained(), Some(80.0), 120));
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_dismissal_latches_while_condition_holds() {
        let mut engine = AlertEngine::new();

        engine.evaluate(&ctx(strained(), Some(80.0), 60));
        engine.dismiss(AlertKind::EyeStrain);

        // Condition still true: the alert must not resurrect
        let alerts = engine.evaluate(&ctx(strained(), Some(80.0), 120));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_condition_clearing_resets_the_latch() {
        let mut engine = AlertEngine::new();

        engine.evaluate(&ctx(strained(), Some(80.0), 60));
        engine.dismiss(AlertKind::EyeStrain);

        // Condition clears...
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 120));
        assert!(alerts.is_empty());

        // ...and re-fires: the alert comes back
        let alerts = engine.evaluate(&ctx(strained(), Some(80.0), 180));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::EyeStrain);
    }

    #[test]
    fn test_alert_removed_when_condition_clears() {
        let mut engine = AlertEngine::new();

        engine.evaluate(&ctx(strained(), Some(80.0), 60));
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 120));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_posture_alert_threshold() {
        let mut engine = AlertEngine::new();

        let alerts = engine.evaluate(&ctx(healthy(), Some(49.0), 60));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Posture);

        // No posture data at all: no alert
        let mut engine = AlertEngine::new();
        let alerts = engine.evaluate(&ctx(healthy(), None, 60));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_long_session_alert() {
        let mut engine = AlertEngine::new();

        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 5400));
        assert!(alerts.is_empty());

        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 5401));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LongSession);
    }

    #[test]
    fn test_break_reminder_once_per_boundary() {
        let mut engine = AlertEngine::new();

        // Just before the first boundary
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 1199));
        assert!(alerts.is_empty());

        // Crossing the boundary fires the reminder once
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 1200));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::BreakReminder);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);

        // Still within the same boundary after dismissal: stays quiet
        engine.dismiss(AlertKind::BreakReminder);
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 1500));
        assert!(alerts.is_empty());

        // Next boundary re-arms it despite the earlier dismissal
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 2400));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::BreakReminder);
    }

    #[test]
    fn test_skipped_evaluations_fire_boundary_once() {
        let mut engine = AlertEngine::new();

        // Jumping straight past two boundaries still yields a single reminder
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 2500));
        assert_eq!(alerts.len(), 1);

        // And no re-fire until the next boundary after that
        engine.dismiss(AlertKind::BreakReminder);
        let alerts = engine.evaluate(&ctx(healthy(), Some(80.0), 3500));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_multiple_alerts_coexist() {
        let mut engine = AlertEngine::new();

        let health = HealthState {
            eye_strain: Level::High,
            fatigue: Level::High,
            health_score: 30,
        };
        let alerts = engine.evaluate(&ctx(health, Some(30.0), 6000));
        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&AlertKind::EyeStrain));
        assert!(kinds.contains(&AlertKind::Fatigue));
        assert!(kinds.contains(&AlertKind::Posture));
        assert!(kinds.contains(&AlertKind::LongSession));
        assert!(kinds.contains(&AlertKind::BreakReminder));
    }
}
