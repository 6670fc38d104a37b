use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::session::SessionId;
use crate::storage::errors::StorageError;
use crate::storage::types::{DEFAULT_KEY_PREFIX, decode_state, encode_state, make_key};

use super::types::{InMemorySessionStore, MemoryEntry, SessionStore};

impl InMemorySessionStore {
    pub fn new(session_duration: Duration) -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entries: Mutex::new(HashMap::new()),
            session_duration,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Namespace keys under `key_prefix`. An empty prefix is ignored and the
    /// current one kept.
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        let key_prefix = key_prefix.into();
        if key_prefix.is_empty() {
            tracing::warn!("Ignoring empty session key prefix, keeping '{}'", self.key_prefix);
            return self;
        }
        self.key_prefix = key_prefix;
        self
    }

    pub fn session_duration(&self) -> Duration {
        self.session_duration
    }

    fn expiry_from(&self, now: Instant) -> Result<Instant, StorageError> {
        now.checked_add(self.session_duration).ok_or_else(|| {
            tracing::error!(
                "Session duration {:?} overflows the store clock",
                self.session_duration
            );
            StorageError::InvalidDuration(format!(
                "{:?} cannot be added to the current time",
                self.session_duration
            ))
        })
    }

    /// Time left before the entry for `session_id` expires, if it exists.
    pub async fn remaining_ttl(&self, session_id: &SessionId) -> Option<Duration> {
        let key = make_key(&self.key_prefix, session_id);
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .get(&key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save<T>(&self, session_id: &SessionId, state: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync,
    {
        if session_id.is_unset() {
            return Err(StorageError::InvalidKey(
                "Cannot save state for an unset session id".to_string(),
            ));
        }

        let value = encode_state(state)?;
        let key = make_key(&self.key_prefix, session_id);
        let now = Instant::now();
        let expires_at = self.expiry_from(now)?;

        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key, MemoryEntry { value, expires_at });
        Ok(())
    }

    async fn get<T>(&self, session_id: &SessionId) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Send,
    {
        if session_id.is_unset() {
            return Err(StorageError::StateNotFound);
        }

        let key = make_key(&self.key_prefix, session_id);
        let now = Instant::now();
        let refreshed_expiry = self.expiry_from(now)?;

        // Read and refresh under one lock acquisition
        let mut entries = self.entries.lock().await;
        let value = match entries.get_mut(&key) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = refreshed_expiry;
                Some(entry.value.clone())
            }
            _ => None,
        };
        let Some(value) = value else {
            entries.remove(&key);
            return Err(StorageError::StateNotFound);
        };
        drop(entries);

        decode_state(&value)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), StorageError> {
        if session_id.is_unset() {
            return Ok(());
        }

        let key = make_key(&self.key_prefix, session_id);
        self.entries.lock().await.remove(&key);
        Ok(())
    }
}
