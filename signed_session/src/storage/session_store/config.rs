use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::{SessionConfig, StoreType};
use crate::session::SessionId;
use crate::storage::errors::StorageError;
use crate::utils::redact_url;

use super::types::{InMemorySessionStore, RedisSessionStore, SessionStore};

/// A session store whose backend is picked at runtime from configuration.
pub enum GenericSessionStore {
    Memory(InMemorySessionStore),
    Redis(RedisSessionStore),
}

impl GenericSessionStore {
    /// Build the store named by `config.store_type`. The Redis backend is
    /// connected and pinged before it is returned.
    pub async fn from_config(config: &SessionConfig) -> Result<Self, StorageError> {
        tracing::info!(
            "Initializing session store with type: {}, url: {}",
            config.store_type,
            redact_url(&config.store_url)
        );

        let store = match config.store_type {
            StoreType::Memory => Self::Memory(
                InMemorySessionStore::new(config.session_duration)
                    .with_key_prefix(config.key_prefix.clone()),
            ),
            StoreType::Redis => {
                let store = RedisSessionStore::connect(
                    &config.store_url,
                    config.session_duration,
                    config.store_timeout,
                )
                .await?
                .with_key_prefix(config.key_prefix.clone());
                store.init().await?;
                Self::Redis(store)
            }
        };

        tracing::info!("Session store ready: type={}", config.store_type);
        Ok(store)
    }
}

#[async_trait]
impl SessionStore for GenericSessionStore {
    async fn save<T>(&self, session_id: &SessionId, state: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync,
    {
        match self {
            Self::Memory(store) => store.save(session_id, state).await,
            Self::Redis(store) => store.save(session_id, state).await,
        }
    }

    async fn get<T>(&self, session_id: &SessionId) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Send,
    {
        match self {
            Self::Memory(store) => store.get(session_id).await,
            Self::Redis(store) => store.get(session_id).await,
        }
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), StorageError> {
        match self {
            Self::Memory(store) => store.delete(session_id).await,
            Self::Redis(store) => store.delete(session_id).await,
        }
    }
}
