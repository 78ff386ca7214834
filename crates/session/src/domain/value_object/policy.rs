//! Session Timeout Policy
//!
//! The per-class timeout configuration. Values normally come from the
//! remote policy source; the hard-coded defaults below are the fallback
//! and must always be usable.

use std::time::Duration;

use super::session_class::SessionClass;

/// Timeout policy for one session class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Maximum idle time before forced logout, resettable by activity
    pub inactivity_timeout: Duration,
    /// Maximum session lifetime from the persisted start, not resettable
    pub session_duration: Duration,
    /// Length of the pre-logout warning countdown
    pub warning_grace: Duration,
}

impl SessionPolicy {
    /// Build a policy from the units the remote source uses
    pub const fn new(
        inactivity_timeout_minutes: u64,
        session_duration_minutes: u64,
        warning_before_logout_seconds: u64,
    ) -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(inactivity_timeout_minutes * 60),
            session_duration: Duration::from_secs(session_duration_minutes * 60),
            warning_grace: Duration::from_secs(warning_before_logout_seconds),
        }
    }

    /// Hard-coded default for a session class.
    ///
    /// This fallback must never fail or block; it is what the session
    /// runs on when the remote source has no row for the class.
    pub const fn default_for(class: SessionClass) -> Self {
        match class {
            // 30 min idle, 8 h absolute, 60 s warning
            SessionClass::Standard => Self::new(30, 480, 60),
            // 15 min idle, 2 h absolute, 60 s warning
            SessionClass::Privileged => Self::new(15, 120, 60),
        }
    }

    /// Idle time after which the warning is shown.
    ///
    /// The warning window is carved out of the inactivity timeout, so
    /// logout still lands at `inactivity_timeout` past the last activity.
    pub fn inactivity_deadline(&self) -> Duration {
        self.inactivity_timeout.saturating_sub(self.warning_grace)
    }

    /// Warning countdown length in whole seconds
    pub fn warning_seconds(&self) -> u64 {
        self.warning_grace.as_secs()
    }

    /// Reject configurations that would break timer arithmetic.
    ///
    /// Remote rows are untrusted; a zero duration or a warning window
    /// wider than either timeout is discarded in favor of the default.
    pub fn is_sane(&self) -> bool {
        !self.inactivity_timeout.is_zero()
            && !self.session_duration.is_zero()
            && !self.warning_grace.is_zero()
            && self.warning_grace < self.inactivity_timeout
            && self.warning_grace < self.session_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_class() {
        let standard = SessionPolicy::default_for(SessionClass::Standard);
        assert_eq!(standard.inactivity_timeout, Duration::from_secs(30 * 60));
        assert_eq!(standard.session_duration, Duration::from_secs(480 * 60));
        assert_eq!(standard.warning_grace, Duration::from_secs(60));

        let privileged = SessionPolicy::default_for(SessionClass::Privileged);
        assert_eq!(privileged.inactivity_timeout, Duration::from_secs(15 * 60));
        assert_eq!(privileged.session_duration, Duration::from_secs(120 * 60));
        assert!(privileged.session_duration < standard.session_duration);
    }

    #[test]
    fn test_defaults_are_sane() {
        assert!(SessionPolicy::default_for(SessionClass::Standard).is_sane());
        assert!(SessionPolicy::default_for(SessionClass::Privileged).is_sane());
    }

    #[test]
    fn test_inactivity_deadline_carves_out_warning() {
        let policy = SessionPolicy::new(5, 480, 60);
        assert_eq!(policy.inactivity_deadline(), Duration::from_secs(4 * 60));
    }

    #[test]
    fn test_insane_policies_rejected() {
        assert!(!SessionPolicy::new(0, 480, 60).is_sane());
        assert!(!SessionPolicy::new(30, 0, 60).is_sane());
        assert!(!SessionPolicy::new(30, 480, 0).is_sane());
        // Warning wider than the inactivity timeout
        assert!(!SessionPolicy::new(1, 480, 120).is_sane());
    }
}
