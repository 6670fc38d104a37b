use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tokio::time::timeout;

use crate::session::SessionId;
use crate::storage::errors::StorageError;
use crate::storage::types::{DEFAULT_KEY_PREFIX, decode_state, encode_state, make_key};

use super::types::{RedisSessionStore, SessionStore};

impl RedisSessionStore {
    /// Open a client for `url` and establish the shared multiplexed
    /// connection, bounded by `op_timeout`.
    pub async fn connect(
        url: &str,
        session_duration: Duration,
        op_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = redis::Client::open(url).map_err(|e| {
            tracing::error!("Failed to create Redis client: {}", e);
            StorageError::from(e)
        })?;
        let conn = timeout(op_timeout, client.get_multiplexed_async_connection())
            .await?
            .map_err(|e| {
                tracing::error!("Failed to connect to Redis: {}", e);
                StorageError::from(e)
            })?;

        tracing::info!("Connected to Redis session store");
        Ok(Self {
            conn,
            session_duration,
            op_timeout,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        })
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

    /// Verify the server answers.
    pub async fn init(&self) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: String = timeout(self.op_timeout, redis::cmd("PING").query_async(&mut conn))
            .await??;
        Ok(())
    }

    /// Time left before the key for `session_id` expires. `None` if the key
    /// does not exist or carries no expiry.
    pub async fn remaining_ttl(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Duration>, StorageError> {
        let mut conn = self.conn.clone();
        let key = make_key(&self.key_prefix, session_id);
        let millis: i64 = timeout(self.op_timeout, conn.pttl(&key)).await??;
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }

    fn ttl_millis(&self) -> u64 {
        ttl_millis(self.session_duration)
    }
}

/// Redis rejects a zero expiry, so sub-millisecond durations round up.
fn ttl_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Reply of [`get_and_refresh`]: the stored bytes, and whether PEXPIRE found
/// the key.
type GetAndRefreshReply = (Option<Vec<u8>>, bool);

/// GET and PEXPIRE inside one MULTI/EXEC, so the entry cannot expire between
/// the read and the refresh.
fn get_and_refresh(key: &str, ttl_ms: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic().get(key).cmd("PEXPIRE").arg(key).arg(ttl_ms);
    pipe
}

#[async_trait]
impl SessionStore for RedisSessionStore {
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
        let mut conn = self.conn.clone();

        // Value and expiry land in one SET so the key never exists without a TTL
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(value).arg("PX").arg(self.ttl_millis());
        let _: () = timeout(self.op_timeout, cmd.query_async(&mut conn))
            .await?
            .map_err(|e| {
                tracing::error!("Failed to save session state: {}", e);
                StorageError::from(e)
            })?;

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
        let mut conn = self.conn.clone();

        let pipe = get_and_refresh(&key, self.ttl_millis());
        let (value, _refreshed): GetAndRefreshReply =
            timeout(self.op_timeout, pipe.query_async(&mut conn))
                .await?
                .map_err(|e| {
                    tracing::error!("Failed to read session state: {}", e);
                    StorageError::from(e)
                })?;

        match value {
            Some(bytes) => decode_state(&bytes),
            None => {
                tracing::debug!("No session state stored for this id");
                Err(StorageError::StateNotFound)
            }
        }
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), StorageError> {
        if session_id.is_unset() {
            return Ok(());
        }

        let key = make_key(&self.key_prefix, session_id);
        let mut conn = self.conn.clone();
        let _: () = timeout(self.op_timeout, conn.del(&key)).await??;
        Ok(())
    }
}
