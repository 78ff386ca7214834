//! Fixed Policy Store
//!
//! In-process policy table for hosts without a remote configuration
//! source, and for tests.

use std::collections::HashMap;

use crate::domain::repository::PolicyStore;
use crate::domain::value_object::{policy::SessionPolicy, session_class::SessionClass};
use crate::error::SessionResult;

/// Policy store backed by a fixed table.
#[derive(Debug, Clone, Default)]
pub struct FixedPolicyStore {
    policies: HashMap<SessionClass, SessionPolicy>,
}

impl FixedPolicyStore {
    /// Empty table; every fetch misses and the caller's default applies
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with the hard-coded default for every class
    pub fn with_defaults() -> Self {
        Self::new()
            .with(
                SessionClass::Standard,
                SessionPolicy::default_for(SessionClass::Standard),
            )
            .with(
                SessionClass::Privileged,
                SessionPolicy::default_for(SessionClass::Privileged),
            )
    }

    pub fn with(mut self, class: SessionClass, policy: SessionPolicy) -> Self {
        self.policies.insert(class, policy);
        self
    }
}

impl PolicyStore for FixedPolicyStore {
    async fn fetch(&self, class: SessionClass) -> SessionResult<Option<SessionPolicy>> {
        Ok(self.policies.get(&class).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_table_misses() {
        let store = FixedPolicyStore::new();
        assert!(store.fetch(SessionClass::Standard).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_defaults_hits_every_class() {
        let store = FixedPolicyStore::with_defaults();
        for class in [SessionClass::Standard, SessionClass::Privileged] {
            assert_eq!(
                store.fetch(class).await.unwrap(),
                Some(SessionPolicy::default_for(class))
            );
        }
    }
}
