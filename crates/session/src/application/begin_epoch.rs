//! Begin Epoch Use Case
//!
//! Loads the persisted session start for a user, discarding stale or
//! unreadable records, and records a fresh start when needed. Storage
//! failures degrade to an in-memory epoch; they never block the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::epoch::SessionEpoch;
use crate::domain::repository::EpochStore;

/// Begin epoch use case
pub struct BeginEpochUseCase<E>
where
    E: EpochStore,
{
    epoch_store: Arc<E>,
    max_age: Duration,
}

impl<E> BeginEpochUseCase<E>
where
    E: EpochStore,
{
    pub fn new(epoch_store: Arc<E>, max_age: Duration) -> Self {
        Self {
            epoch_store,
            max_age,
        }
    }

    /// Load or start the epoch for `user_id` as of `now`.
    pub async fn execute(&self, user_id: &UserId, now: DateTime<Utc>) -> SessionEpoch {
        match self.epoch_store.load(user_id).await {
            Ok(Some(epoch)) if !epoch.is_stale(now, self.max_age) => {
                tracing::debug!(
                    user_id = %user_id,
                    started_at = %epoch.started_at,
                    "Resuming persisted session epoch"
                );
                epoch
            }
            Ok(Some(stale)) => {
                tracing::info!(
                    user_id = %user_id,
                    started_at = %stale.started_at,
                    "Stored epoch is stale, starting fresh"
                );
                self.record_fresh(user_id, now).await
            }
            Ok(None) => self.record_fresh(user_id, now).await,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Epoch load failed, starting fresh in memory"
                );
                self.record_fresh(user_id, now).await
            }
        }
    }

    async fn record_fresh(&self, user_id: &UserId, now: DateTime<Utc>) -> SessionEpoch {
        let epoch = SessionEpoch::begin(*user_id, now);
        if let Err(e) = self.epoch_store.save(&epoch).await {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to persist session epoch");
        }
        epoch
    }
}
