//! Repository Traits
//!
//! Interfaces for persistence and the remote policy source.
//! Implementations live in the infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::epoch::SessionEpoch;
use crate::domain::value_object::{policy::SessionPolicy, session_class::SessionClass};
use crate::error::SessionResult;

/// Persisted session-start repository trait
#[trait_variant::make(EpochStore: Send)]
pub trait LocalEpochStore {
    /// Load the stored epoch for a user, if any.
    ///
    /// A stored value that cannot be interpreted is reported as absent,
    /// not as an error.
    async fn load(&self, user_id: &UserId) -> SessionResult<Option<SessionEpoch>>;

    /// Record an epoch, overwriting any previous one for the user
    async fn save(&self, epoch: &SessionEpoch) -> SessionResult<()>;

    /// Remove the stored epoch; removing an absent record is a no-op
    async fn clear(&self, user_id: &UserId) -> SessionResult<()>;
}

/// Remote timeout-policy source trait
#[trait_variant::make(PolicyStore: Send)]
pub trait LocalPolicyStore {
    /// Fetch the policy for a session class.
    ///
    /// `Ok(None)` means the source has no row for the class; the caller
    /// substitutes the hard-coded default either way.
    async fn fetch(&self, class: SessionClass) -> SessionResult<Option<SessionPolicy>>;
}
