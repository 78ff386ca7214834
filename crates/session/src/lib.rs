//! Session Lifecycle Engine
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, pure policy
//! - `application/` - Use cases, activity tracking, the manager runtime
//! - `infra/` - Store implementations and the remote policy source
//!
//! ## Features
//! - Rolling inactivity timeout, resettable by throttled user activity
//! - Absolute session duration that survives host reloads
//! - Pre-logout warning countdown with extend support
//! - Per-class timeout policy resolved remotely with a hard-coded fallback
//!
//! ## Degradation Model
//! - Policy fetch failure falls back to the class default, never blocks
//! - Stale or unreadable persisted state is replaced, never an error
//! - Expiry paths are idempotent; the host logout callback fires once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::activity::{ActivityConfig, ActivityTracker, InputKind};
pub use application::config::ManagerConfig;
pub use application::manager::{LogoutHook, SessionHandle, SessionManager, SessionView};
pub use domain::entity::context::SessionContext;
pub use domain::entity::phase::SessionPhase;
pub use domain::repository::{EpochStore, PolicyStore};
pub use domain::services::{ClassPolicy, DefaultClassPolicy};
pub use domain::value_object::logout_reason::LogoutReason;
pub use domain::value_object::member_role::MemberRole;
pub use domain::value_object::policy::SessionPolicy;
pub use domain::value_object::session_class::SessionClass;
pub use error::{SessionError, SessionResult};
pub use infra::fixed::FixedPolicyStore;
pub use infra::http::HttpPolicyStore;
pub use infra::kv::KvEpochStore;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::logout_reason::*;
    pub use crate::domain::value_object::member_role::*;
    pub use crate::domain::value_object::policy::*;
    pub use crate::domain::value_object::session_class::*;
}

pub mod store {
    pub use crate::infra::fixed::FixedPolicyStore;
    pub use crate::infra::http::HttpPolicyStore;
    pub use crate::infra::kv::KvEpochStore;
}
