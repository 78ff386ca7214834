use serde::{Deserialize, Serialize};
use std::fmt;

/// Portal role, as assigned by the hosting application.
///
/// Role codes arrive from the host as plain strings; an unknown code
/// degrades to `Member` rather than failing, since this subsystem must
/// never block session usability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum MemberRole {
    #[default]
    Member = 0,
    Coach = 1,
    Treasurer = 2,
    Admin = 3,
    SuperAdmin = 4,
}

impl MemberRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use MemberRole::*;
        match self {
            Member => "member",
            Coach => "coach",
            Treasurer => "treasurer",
            Admin => "admin",
            SuperAdmin => "super_admin",
        }
    }

    /// Whether this role manages association funds
    #[inline]
    pub const fn handles_funds(&self) -> bool {
        use MemberRole::*;
        matches!(self, Treasurer | Admin | SuperAdmin)
    }

    #[inline]
    pub const fn is_admin_or_higher(&self) -> bool {
        use MemberRole::*;
        matches!(self, Admin | SuperAdmin)
    }

    #[inline]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, MemberRole::SuperAdmin)
    }

    #[inline]
    pub fn from_code(code: &str) -> Self {
        use MemberRole::*;
        match code {
            "member" => Member,
            "coach" => Coach,
            "treasurer" => Treasurer,
            "admin" => Admin,
            "super_admin" => SuperAdmin,
            other => {
                tracing::warn!(code = other, "Unknown role code, treating as member");
                Member
            }
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_from_code() {
        assert_eq!(MemberRole::from_code("member"), MemberRole::Member);
        assert_eq!(MemberRole::from_code("coach"), MemberRole::Coach);
        assert_eq!(MemberRole::from_code("treasurer"), MemberRole::Treasurer);
        assert_eq!(MemberRole::from_code("admin"), MemberRole::Admin);
        assert_eq!(MemberRole::from_code("super_admin"), MemberRole::SuperAdmin);
    }

    #[test]
    fn test_unknown_code_degrades_to_member() {
        assert_eq!(MemberRole::from_code("intergalactic"), MemberRole::Member);
        assert_eq!(MemberRole::from_code(""), MemberRole::Member);
    }

    #[test]
    fn test_member_role_display() {
        assert_eq!(MemberRole::Member.to_string(), "member");
        assert_eq!(MemberRole::Treasurer.to_string(), "treasurer");
        assert_eq!(MemberRole::SuperAdmin.to_string(), "super_admin");
    }

    #[test]
    fn test_member_role_checks() {
        assert!(!MemberRole::Member.handles_funds());
        assert!(!MemberRole::Coach.handles_funds());
        assert!(MemberRole::Treasurer.handles_funds());
        assert!(MemberRole::Admin.handles_funds());
        assert!(MemberRole::SuperAdmin.handles_funds());
        assert!(!MemberRole::Treasurer.is_admin_or_higher());
        assert!(MemberRole::Admin.is_admin_or_higher());
        assert!(!MemberRole::Admin.is_super_admin());
        assert!(MemberRole::SuperAdmin.is_super_admin());
    }
}
