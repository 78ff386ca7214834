//! Session Activity Tracking
//!
//! Collapses raw user-interaction bursts into individual activity
//! signals for the manager. A mousemove storm becomes at most one
//! signal per throttle window.

use std::time::Instant;

use platform::throttle::{Throttle, ThrottleConfig};
use serde::{Deserialize, Serialize};

/// Qualifying user-interaction kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Pointer movement
    Pointer,
    /// Key press
    Key,
    /// Scroll
    Scroll,
    /// Touch start
    Touch,
    /// Wheel
    Wheel,
    /// Click
    Click,
}

/// Configuration for activity tracking
#[derive(Debug, Clone, Copy)]
pub struct ActivityConfig {
    /// Throttle window (default: 1000 ms)
    pub throttle: ThrottleConfig,
    /// Whether events are observed at all
    pub enabled: bool,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            throttle: ThrottleConfig::default(),
            enabled: true,
        }
    }
}

/// Activity tracker.
///
/// `on_activity` fires once per admitted event; wire it to
/// [`SessionHandle::record_activity`](crate::application::manager::SessionHandle::record_activity).
pub struct ActivityTracker<F>
where
    F: FnMut(InputKind),
{
    throttle: Throttle,
    enabled: bool,
    on_activity: F,
}

impl<F> ActivityTracker<F>
where
    F: FnMut(InputKind),
{
    pub fn new(config: ActivityConfig, on_activity: F) -> Self {
        Self {
            throttle: Throttle::new(config.throttle),
            enabled: config.enabled,
            on_activity,
        }
    }

    /// Observe an event happening now; returns whether it was admitted.
    pub fn observe(&mut self, kind: InputKind) -> bool {
        self.observe_at(kind, Instant::now())
    }

    /// Timestamp-explicit variant of [`observe`](Self::observe).
    pub fn observe_at(&mut self, kind: InputKind, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        if self.throttle.admit(now) {
            (self.on_activity)(kind);
            true
        } else {
            false
        }
    }

    /// While disabled, events are ignored without touching the throttle.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Instant of the last admitted event, for introspection
    pub fn last_activity(&self) -> Option<Instant> {
        self.throttle.last_admitted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_burst_of_pointer_events_admits_one() {
        let mut count = 0usize;
        let mut tracker = ActivityTracker::new(ActivityConfig::default(), |_| count += 1);
        let base = Instant::now();

        for i in 0..100 {
            tracker.observe_at(InputKind::Pointer, base + Duration::from_millis(i * 10));
        }

        assert_eq!(tracker.last_activity(), Some(base));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_admits_again_after_window() {
        let mut count = 0usize;
        let mut tracker = ActivityTracker::new(ActivityConfig::default(), |_| count += 1);
        let base = Instant::now();

        assert!(tracker.observe_at(InputKind::Click, base));
        assert!(tracker.observe_at(InputKind::Key, base + Duration::from_millis(1500)));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_disabled_tracker_ignores_events() {
        let mut count = 0usize;
        let mut tracker = ActivityTracker::new(ActivityConfig::default(), |_| count += 1);
        tracker.set_enabled(false);

        assert!(!tracker.observe(InputKind::Scroll));
        assert_eq!(tracker.last_activity(), None);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_reenabled_tracker_admits_immediately() {
        let mut count = 0usize;
        let mut tracker = ActivityTracker::new(ActivityConfig::default(), |_| count += 1);
        let base = Instant::now();

        tracker.set_enabled(false);
        tracker.observe_at(InputKind::Touch, base);
        tracker.set_enabled(true);

        assert!(tracker.observe_at(InputKind::Touch, base + Duration::from_millis(1)));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_callback_sees_input_kind() {
        let mut seen = Vec::new();
        let mut tracker = ActivityTracker::new(ActivityConfig::default(), |kind| seen.push(kind));
        let base = Instant::now();

        tracker.observe_at(InputKind::Wheel, base);
        tracker.observe_at(InputKind::Key, base + Duration::from_secs(2));

        assert_eq!(seen, vec![InputKind::Wheel, InputKind::Key]);
    }
}
