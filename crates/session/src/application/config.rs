//! Application Configuration
//!
//! Configuration for the manager's ambient timing, as opposed to the
//! per-class [`SessionPolicy`](crate::domain::value_object::policy::SessionPolicy)
//! which governs the session itself.

use std::time::Duration;

/// Manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// How often remaining lifetime is recomputed from the wall clock.
    ///
    /// This is the safety net for missed timers after host suspension
    /// (laptop sleep); the recomputed value is the source of truth.
    pub validity_check_interval: Duration,
    /// Oldest stored epoch still honored on load (24 hours)
    pub epoch_max_age: Duration,
    /// Warning countdown tick (1 second)
    pub countdown_tick: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            validity_check_interval: Duration::from_secs(60),
            epoch_max_age: Duration::from_secs(24 * 3600),
            countdown_tick: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.validity_check_interval, Duration::from_secs(60));
        assert_eq!(config.epoch_max_age, Duration::from_secs(24 * 3600));
        assert_eq!(config.countdown_tick, Duration::from_secs(1));
    }
}
