//! Session Context
//!
//! What the hosting application hands over when a user is signed in.

use kernel::id::UserId;

use crate::domain::value_object::member_role::MemberRole;

/// Host-supplied session context.
///
/// The engine treats the authenticated session itself as opaque; only
/// the user id, role, and permission set feed into policy resolution.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: UserId,
    pub role: MemberRole,
    pub permissions: Vec<String>,
}

impl SessionContext {
    /// Build a context from the raw values the host provides
    pub fn new(user_id: UserId, role_code: &str, permissions: Vec<String>) -> Self {
        Self {
            user_id,
            role: MemberRole::from_code(role_code),
            permissions,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
