//! Key/Value Epoch Store
//!
//! Persists session epochs through any
//! [`platform::kv::KeyValueStore`], one key per user:
//! `<prefix>_<user id>` holding an RFC 3339 timestamp string.
//!
//! Last-write-wins: two hosts racing for the same user will each record
//! their own start; nothing arbitrates between them here.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::kv::KeyValueStore;

use crate::domain::entity::epoch::SessionEpoch;
use crate::domain::repository::EpochStore;
use crate::error::SessionResult;

const DEFAULT_PREFIX: &str = "session_start";

/// Epoch store over a key/value backend.
#[derive(Debug, Clone)]
pub struct KvEpochStore<S> {
    store: S,
    prefix: String,
}

impl<S> KvEpochStore<S>
where
    S: KeyValueStore + Sync,
{
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn key(&self, user_id: &UserId) -> String {
        format!("{}_{}", self.prefix, user_id)
    }
}

impl<S> EpochStore for KvEpochStore<S>
where
    S: KeyValueStore + Send + Sync,
{
    async fn load(&self, user_id: &UserId) -> SessionResult<Option<SessionEpoch>> {
        let key = self.key(user_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(started_at) => Ok(Some(SessionEpoch {
                user_id: *user_id,
                started_at: started_at.with_timezone(&Utc),
            })),
            Err(e) => {
                // Unreadable values are reported as absent so the caller
                // records a fresh start over them
                tracing::warn!(
                    user_id = %user_id,
                    value = %raw,
                    error = %e,
                    "Stored epoch is unreadable, treating as absent"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, epoch: &SessionEpoch) -> SessionResult<()> {
        let key = self.key(&epoch.user_id);
        self.store
            .set(&key, &epoch.started_at.to_rfc3339())
            .await?;
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> SessionResult<()> {
        self.store.remove(&self.key(user_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::kv::MemoryKvStore;

    #[tokio::test]
    async fn test_round_trip() {
        let store = KvEpochStore::new(MemoryKvStore::new());
        let epoch = SessionEpoch::begin(UserId::new(), Utc::now());

        store.save(&epoch).await.unwrap();
        let loaded = store.load(&epoch.user_id).await.unwrap().unwrap();

        // RFC 3339 keeps sub-second precision, so the timestamp survives
        assert_eq!(loaded.started_at, epoch.started_at);
        assert_eq!(loaded.user_id, epoch.user_id);
    }

    #[tokio::test]
    async fn test_absent_user_loads_none() {
        let store = KvEpochStore::new(MemoryKvStore::new());
        assert!(store.load(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_garbage_value_loads_none() {
        let kv = MemoryKvStore::new();
        let store = KvEpochStore::new(kv.clone());
        let user = UserId::new();

        kv.set(&format!("session_start_{}", user), "not-a-timestamp")
            .await
            .unwrap();

        assert!(store.load(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let kv = MemoryKvStore::new();
        let store = KvEpochStore::new(kv.clone());
        let epoch = SessionEpoch::begin(UserId::new(), Utc::now());

        store.save(&epoch).await.unwrap();
        store.clear(&epoch.user_id).await.unwrap();

        assert!(store.load(&epoch.user_id).await.unwrap().is_none());
        assert!(kv.is_empty());

        // Clearing again is a no-op
        store.clear(&epoch.user_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_prefix_shapes_key() {
        let kv = MemoryKvStore::new();
        let store = KvEpochStore::with_prefix(kv.clone(), "portal_session");
        let epoch = SessionEpoch::begin(UserId::new(), Utc::now());

        store.save(&epoch).await.unwrap();

        let key = format!("portal_session_{}", epoch.user_id);
        assert!(kv.get(&key).await.unwrap().is_some());
    }
}
