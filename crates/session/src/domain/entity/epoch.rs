//! Session Epoch Entity
//!
//! The persisted session start record. One epoch per user; it is what
//! lets the absolute-duration timer survive a host reload.

use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::UserId;

/// Persisted session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEpoch {
    /// Owning user
    pub user_id: UserId,
    /// When the session began
    pub started_at: DateTime<Utc>,
}

impl SessionEpoch {
    /// Start a fresh epoch at `now`
    pub fn begin(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            started_at: now,
        }
    }

    /// Time elapsed since the epoch started, clamped to zero.
    ///
    /// A start timestamp in the future (clock skew, tampering) reads as
    /// zero elapsed rather than negative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether a stored epoch is too old to honor.
    ///
    /// Future-dated epochs are also stale; both cases get a fresh start.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        if self.started_at > now {
            return true;
        }
        self.elapsed(now) >= max_age
    }

    /// Session lifetime remaining under the given absolute duration
    pub fn remaining(&self, now: DateTime<Utc>, session_duration: Duration) -> Duration {
        session_duration.saturating_sub(self.elapsed(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    const DAY: Duration = Duration::from_secs(24 * 3600);

    #[test]
    fn test_elapsed_and_remaining() {
        let now = Utc::now();
        let epoch = SessionEpoch::begin(UserId::new(), now);

        let later = now + TimeDelta::minutes(10);
        assert_eq!(epoch.elapsed(later), Duration::from_secs(600));
        assert_eq!(
            epoch.remaining(later, Duration::from_secs(30 * 60)),
            Duration::from_secs(20 * 60)
        );
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let now = Utc::now();
        let epoch = SessionEpoch::begin(UserId::new(), now);

        let later = now + TimeDelta::hours(9);
        assert_eq!(epoch.remaining(later, Duration::from_secs(3600)), Duration::ZERO);
    }

    #[test]
    fn test_staleness_boundary() {
        let now = Utc::now();

        let fresh = SessionEpoch::begin(UserId::new(), now - TimeDelta::hours(23));
        assert!(!fresh.is_stale(now, DAY));

        let stale = SessionEpoch::begin(UserId::new(), now - TimeDelta::hours(25));
        assert!(stale.is_stale(now, DAY));
    }

    #[test]
    fn test_future_epoch_is_stale() {
        let now = Utc::now();
        let future = SessionEpoch::begin(UserId::new(), now + TimeDelta::minutes(5));
        assert!(future.is_stale(now, DAY));
        assert_eq!(future.elapsed(now), Duration::ZERO);
    }
}
