use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Policy bucket determining which timeout configuration applies.
///
/// Derived once per session from the user's role and permission set;
/// privileged sessions get shorter lifetimes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionClass {
    #[default]
    #[display("standard")]
    Standard,
    #[display("privileged")]
    Privileged,
}

impl SessionClass {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            SessionClass::Standard => "standard",
            SessionClass::Privileged => "privileged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_class_code() {
        assert_eq!(SessionClass::Standard.code(), "standard");
        assert_eq!(SessionClass::Privileged.code(), "privileged");
    }

    #[test]
    fn test_session_class_display_matches_code() {
        assert_eq!(SessionClass::Standard.to_string(), "standard");
        assert_eq!(SessionClass::Privileged.to_string(), "privileged");
    }
}
