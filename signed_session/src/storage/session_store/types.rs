use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::session::SessionId;
use crate::storage::errors::StorageError;

pub struct InMemorySessionStore {
    pub(super) entries: Mutex<HashMap<String, MemoryEntry>>,
    pub(super) session_duration: Duration,
    pub(super) key_prefix: String,
}

pub(super) struct MemoryEntry {
    pub(super) value: Vec<u8>,
    pub(super) expires_at: Instant,
}

/// Session store backed by Redis key expiry.
///
/// Cloning is cheap; clones share one multiplexed connection.
#[derive(Clone)]
pub struct RedisSessionStore {
    pub(super) conn: MultiplexedConnection,
    pub(super) session_duration: Duration,
    pub(super) op_timeout: Duration,
    pub(super) key_prefix: String,
}

/// Persistence for session state keyed by [`SessionId`].
///
/// Entries live for the store's configured session duration. Reading an entry
/// restarts that countdown, so an active session stays alive.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist `state` under `session_id`, overwriting any previous entry and
    /// restarting its time-to-live.
    async fn save<T>(&self, session_id: &SessionId, state: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync;

    /// Load the state saved under `session_id` and reset its time-to-live to
    /// the full session duration.
    ///
    /// Returns `StorageError::StateNotFound` if nothing is stored, and
    /// `StorageError::Decode` if the stored bytes are not a valid `T`.
    async fn get<T>(&self, session_id: &SessionId) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Send;

    /// Remove any state saved under `session_id`. Removing a missing entry
    /// succeeds.
    async fn delete(&self, session_id: &SessionId) -> Result<(), StorageError>;
}
