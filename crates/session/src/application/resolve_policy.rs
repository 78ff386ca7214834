//! Resolve Policy Use Case
//!
//! Fetches the timeout policy for a session class, falling back to the
//! hard-coded default on miss or error. This path never fails and never
//! blocks session usability.

use std::sync::Arc;

use crate::domain::repository::PolicyStore;
use crate::domain::value_object::{policy::SessionPolicy, session_class::SessionClass};

/// Resolve policy use case
pub struct ResolvePolicyUseCase<P>
where
    P: PolicyStore,
{
    policy_store: Arc<P>,
}

impl<P> ResolvePolicyUseCase<P>
where
    P: PolicyStore,
{
    pub fn new(policy_store: Arc<P>) -> Self {
        Self { policy_store }
    }

    /// Resolve the effective policy for `class`.
    ///
    /// Remote rows that fail the sanity check are discarded the same way
    /// a missing row is.
    pub async fn execute(&self, class: SessionClass) -> SessionPolicy {
        match self.policy_store.fetch(class).await {
            Ok(Some(policy)) if policy.is_sane() => policy,
            Ok(Some(policy)) => {
                tracing::warn!(
                    class = %class,
                    ?policy,
                    "Remote policy rejected as nonsense, using default"
                );
                SessionPolicy::default_for(class)
            }
            Ok(None) => {
                tracing::debug!(class = %class, "No remote policy, using default");
                SessionPolicy::default_for(class)
            }
            Err(e) => {
                tracing::warn!(class = %class, error = %e, "Policy fetch failed, using default");
                SessionPolicy::default_for(class)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SessionError, SessionResult};
    use crate::infra::fixed::FixedPolicyStore;
    use kernel::error::app_error::AppError;

    struct FailingPolicyStore;

    impl PolicyStore for FailingPolicyStore {
        async fn fetch(&self, _class: SessionClass) -> SessionResult<Option<SessionPolicy>> {
            Err(SessionError::policy(AppError::network("source down")))
        }
    }

    #[tokio::test]
    async fn test_remote_policy_wins_when_present() {
        let remote = SessionPolicy::new(10, 60, 30);
        let store = FixedPolicyStore::new().with(SessionClass::Standard, remote);
        let resolve = ResolvePolicyUseCase::new(Arc::new(store));

        assert_eq!(resolve.execute(SessionClass::Standard).await, remote);
    }

    #[tokio::test]
    async fn test_missing_row_falls_back_to_default() {
        let resolve = ResolvePolicyUseCase::new(Arc::new(FixedPolicyStore::new()));

        let policy = resolve.execute(SessionClass::Privileged).await;
        assert_eq!(policy, SessionPolicy::default_for(SessionClass::Privileged));
    }

    #[tokio::test]
    async fn test_fetch_error_falls_back_to_default() {
        let resolve = ResolvePolicyUseCase::new(Arc::new(FailingPolicyStore));

        let policy = resolve.execute(SessionClass::Standard).await;
        assert_eq!(policy, SessionPolicy::default_for(SessionClass::Standard));
    }

    #[tokio::test]
    async fn test_insane_remote_row_falls_back_to_default() {
        let garbage = SessionPolicy::new(0, 0, 0);
        let store = FixedPolicyStore::new().with(SessionClass::Standard, garbage);
        let resolve = ResolvePolicyUseCase::new(Arc::new(store));

        let policy = resolve.execute(SessionClass::Standard).await;
        assert_eq!(policy, SessionPolicy::default_for(SessionClass::Standard));
    }
}
