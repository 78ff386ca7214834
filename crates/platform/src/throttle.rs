//! Event Throttling
//!
//! Interval gate that admits at most one event per configured window.
//! Callers supply the timestamp, which keeps the gate deterministic
//! under test.

use std::time::{Duration, Instant};

/// Throttle configuration
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    /// Minimum interval between admitted events
    pub min_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
        }
    }
}

impl ThrottleConfig {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }
}

/// Interval gate.
///
/// The first event is always admitted; subsequent events are admitted
/// only once `min_interval` has elapsed since the last admission.
#[derive(Debug, Clone)]
pub struct Throttle {
    config: ThrottleConfig,
    last_admitted: Option<Instant>,
}

impl Throttle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            last_admitted: None,
        }
    }

    /// Offer an event observed at `now`; returns whether it is admitted.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last_admitted {
            Some(last) if now.duration_since(last) < self.config.min_interval => false,
            _ => {
                self.last_admitted = Some(now);
                true
            }
        }
    }

    /// Instant of the last admitted event
    pub fn last_admitted(&self) -> Option<Instant> {
        self.last_admitted
    }

    /// Forget the last admission; the next event is admitted unconditionally
    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_admitted() {
        let mut throttle = Throttle::new(ThrottleConfig::default());
        assert!(throttle.admit(Instant::now()));
    }

    #[test]
    fn test_burst_collapsed_to_one() {
        let mut throttle = Throttle::new(ThrottleConfig::new(1000));
        let base = Instant::now();

        let admitted = (0..100)
            .filter(|i| throttle.admit(base + Duration::from_millis(i * 10)))
            .count();

        assert_eq!(admitted, 1);
    }

    #[test]
    fn test_admits_again_after_interval() {
        let mut throttle = Throttle::new(ThrottleConfig::new(1000));
        let base = Instant::now();

        assert!(throttle.admit(base));
        assert!(!throttle.admit(base + Duration::from_millis(999)));
        assert!(throttle.admit(base + Duration::from_millis(1000)));
    }

    #[test]
    fn test_reset_reopens_gate() {
        let mut throttle = Throttle::new(ThrottleConfig::new(1000));
        let base = Instant::now();

        assert!(throttle.admit(base));
        assert!(!throttle.admit(base + Duration::from_millis(1)));

        throttle.reset();
        assert!(throttle.admit(base + Duration::from_millis(2)));
        assert_eq!(throttle.last_admitted(), Some(base + Duration::from_millis(2)));
    }
}
