//! Injectable time source
//!
//! The smoothing and alert cadences are defined against wall-clock time, but
//! waiting in tests is a non-starter. Components read time through the
//! [`Clock`] trait; production code uses [`SystemClock`], tests drive a
//! [`ManualClock`] forward explicitly.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Interior-mutable so a shared handle (`Rc<ManualClock>`) can be advanced
/// while an engine holds the other reference.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Set the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }

    #[test]
    fn test_shared_manual_clock() {
        let start = Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap();
        let clock = Rc::new(ManualClock::new(start));
        let handle: Box<dyn Clock> = Box::new(clock.clone());

        clock.advance(Duration::minutes(5));
        assert_eq!(handle.now(), start + Duration::minutes(5));
    }
}
