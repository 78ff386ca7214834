//! HTTP Policy Store
//!
//! Fetches the per-class timeout configuration from the portal's hosted
//! backend: `GET <base>/session-policies/<class>` returning a JSON row.
//! A 404 means the class has no row and maps to `Ok(None)`; transport
//! failures surface as errors so the caller can fall back and warn.

use kernel::error::app_error::AppError;
use serde::Deserialize;

use crate::domain::repository::PolicyStore;
use crate::domain::value_object::{policy::SessionPolicy, session_class::SessionClass};
use crate::error::{SessionError, SessionResult};

/// Wire format of a policy row
#[derive(Debug, Deserialize)]
struct PolicyRow {
    inactivity_timeout_minutes: u64,
    session_duration_minutes: u64,
    warning_before_logout_seconds: u64,
}

impl From<PolicyRow> for SessionPolicy {
    fn from(row: PolicyRow) -> Self {
        SessionPolicy::new(
            row.inactivity_timeout_minutes,
            row.session_duration_minutes,
            row.warning_before_logout_seconds,
        )
    }
}

/// Policy store backed by the portal backend.
#[derive(Debug, Clone)]
pub struct HttpPolicyStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPolicyStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn policy_url(&self, class: SessionClass) -> String {
        format!(
            "{}/session-policies/{}",
            self.base_url.trim_end_matches('/'),
            class.code()
        )
    }
}

impl PolicyStore for HttpPolicyStore {
    async fn fetch(&self, class: SessionClass) -> SessionResult<Option<SessionPolicy>> {
        let url = self.policy_url(class);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SessionError::policy(AppError::network("Policy fetch failed").with_source(e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(|e| {
            SessionError::policy(AppError::network("Policy source returned an error").with_source(e))
        })?;

        let row: PolicyRow = response.json().await.map_err(|e| {
            SessionError::policy(
                AppError::serialization("Policy row could not be decoded").with_source(e),
            )
        })?;

        let policy = SessionPolicy::from(row);
        if policy.is_sane() {
            Ok(Some(policy))
        } else {
            // Nonsense rows are a miss, not an error; the default applies
            tracing::warn!(class = %class, ?policy, "Remote policy row rejected");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_url_shape() {
        let store = HttpPolicyStore::new("https://api.example.org/config/");
        assert_eq!(
            store.policy_url(SessionClass::Privileged),
            "https://api.example.org/config/session-policies/privileged"
        );
    }

    #[test]
    fn test_policy_row_decodes_and_converts() {
        let row: PolicyRow = serde_json::from_str(
            r#"{
                "inactivity_timeout_minutes": 20,
                "session_duration_minutes": 240,
                "warning_before_logout_seconds": 90
            }"#,
        )
        .unwrap();

        let policy = SessionPolicy::from(row);
        assert_eq!(policy, SessionPolicy::new(20, 240, 90));
        assert!(policy.is_sane());
    }
}
