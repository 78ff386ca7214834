use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Why the engine forced a logout.
///
/// An explicit host-requested logout carries no reason; the warning
/// dialog uses the reason to choose its wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The rolling inactivity timeout elapsed
    #[display("inactivity")]
    Inactivity,
    /// The absolute session duration elapsed
    #[display("session_expired")]
    SessionExpired,
}

impl LogoutReason {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            LogoutReason::Inactivity => "inactivity",
            LogoutReason::SessionExpired => "session_expired",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_reason_code() {
        assert_eq!(LogoutReason::Inactivity.code(), "inactivity");
        assert_eq!(LogoutReason::SessionExpired.code(), "session_expired");
    }

    #[test]
    fn test_logout_reason_serde_codes() {
        let json = serde_json::to_string(&LogoutReason::SessionExpired).unwrap();
        assert_eq!(json, "\"session_expired\"");
    }
}
