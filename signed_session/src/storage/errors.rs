use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No entry for the identifier: never saved, deleted, or expired.
    #[error("No session state was found in the session store")]
    StateNotFound,

    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    /// Stored bytes could not be turned back into the requested payload type.
    #[error("Failed to decode stored session state: {0}")]
    Decode(String),

    #[error("Failed to encode session state: {0}")]
    Encode(String),

    #[error("Invalid session store key: {0}")]
    InvalidKey(String),

    /// The configured session duration cannot be applied to the store clock.
    #[error("Invalid session duration: {0}")]
    InvalidDuration(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for StorageError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Unavailable("operation timed out".to_string())
    }
}
