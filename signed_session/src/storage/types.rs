use serde::{Serialize, de::DeserializeOwned};

use crate::session::SessionId;
use crate::storage::errors::StorageError;

/// Namespace prepended to every session key in a shared backing service.
pub const DEFAULT_KEY_PREFIX: &str = "sid:";

pub(crate) fn make_key(prefix: &str, session_id: &SessionId) -> String {
    format!("{prefix}{session_id}")
}

/// Serialize session state to the bytes written to the backing store.
pub(crate) fn encode_state<T>(state: &T) -> Result<Vec<u8>, StorageError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(state).map_err(|e| StorageError::Encode(e.to_string()))
}

pub(crate) fn decode_state<T>(bytes: &[u8]) -> Result<T, StorageError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::error!("Stored session state is corrupt: {}", e);
        StorageError::Decode(e.to_string())
    })
}
