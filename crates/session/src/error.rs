//! Session Error Types
//!
//! Internal error vocabulary for the engine. None of these reach the
//! host through the handle; every failure mode degrades to a default
//! policy or a forced logout.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// Epoch persistence failed
    #[error("Session storage error: {0}")]
    Storage(#[from] AppError),

    /// Remote policy source failed
    #[error("Policy source error: {0}")]
    Policy(#[source] AppError),

    /// Command sent after the manager terminated
    #[error("Session manager is not running")]
    ManagerClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Wrap a policy-source failure
    pub fn policy(err: AppError) -> Self {
        SessionError::Policy(err)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Storage(e) | SessionError::Policy(e) => e.kind(),
            SessionError::ManagerClosed => ErrorKind::Internal,
            SessionError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether retrying the failed operation could plausibly succeed
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_kind() {
        let err: SessionError = AppError::storage("backend down").into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.is_transient());
    }

    #[test]
    fn test_policy_error_keeps_kind() {
        let err = SessionError::policy(AppError::network("unreachable"));
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.is_transient());
    }

    #[test]
    fn test_internal_errors_not_transient() {
        assert!(!SessionError::ManagerClosed.is_transient());
        assert!(!SessionError::Internal("bug".into()).is_transient());
    }
}
