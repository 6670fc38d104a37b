use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The signing key or another setting is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The system random source could not supply bytes.
    #[error("Entropy error: {0}")]
    Entropy(String),

    #[error("Malformed session token: {0}")]
    MalformedToken(String),

    #[error("Session token signature mismatch")]
    SignatureMismatch,

    #[error("Authorization scheme not supported")]
    InvalidScheme,

    #[error("No session ID found in Authorization header or auth query parameter")]
    NoSessionId,

    #[error("Header error: {0}")]
    Header(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True when the caller presented no usable credentials, as opposed to a
    /// server-side failure.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken(_)
                | Self::SignatureMismatch
                | Self::InvalidScheme
                | Self::NoSessionId
                | Self::Storage(StorageError::StateNotFound)
        )
    }
}

impl From<UtilError> for SessionError {
    fn from(err: UtilError) -> Self {
        match err {
            UtilError::Crypto(msg) => Self::Entropy(msg),
            UtilError::Format(msg) => Self::MalformedToken(msg),
        }
    }
}
