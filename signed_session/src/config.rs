//! Session configuration loaded from the environment
//!
//! | Variable                   | Default                  |
//! |----------------------------|--------------------------|
//! | `SESSION_SIGNING_KEY`      | required, non-empty      |
//! | `SESSION_DURATION_SECS`    | `600`                    |
//! | `SESSION_STORE_TYPE`       | `memory`                 |
//! | `SESSION_STORE_URL`        | `redis://127.0.0.1:6379` |
//! | `SESSION_STORE_TIMEOUT_MS` | `2000`                   |
//! | `SESSION_KEY_PREFIX`       | `sid:`                   |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::session::SessionError;
use crate::storage::DEFAULT_KEY_PREFIX;
use crate::utils::redact_url;

const DEFAULT_SESSION_DURATION_SECS: u64 = 600;
const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;
/// One year. Longer sessions are refused rather than risking clock overflow.
pub const MAX_SESSION_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    Redis,
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Redis => f.write_str("redis"),
        }
    }
}

impl FromStr for StoreType {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            t => Err(SessionError::Configuration(format!(
                "Unsupported session store type: {t}. Supported types are 'memory' and 'redis'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct SessionConfig {
    pub signing_key: String,
    pub session_duration: Duration,
    pub store_type: StoreType,
    pub store_url: String,
    pub store_timeout: Duration,
    pub key_prefix: String,
}

// Keeps the signing key out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("signing_key", &"<redacted>")
            .field("session_duration", &self.session_duration)
            .field("store_type", &self.store_type)
            .field("store_url", &redact_url(&self.store_url))
            .field("store_timeout", &self.store_timeout)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl SessionConfig {
    /// In-memory configuration with defaults for everything but the key and
    /// duration.
    pub fn new(
        signing_key: impl Into<String>,
        session_duration: Duration,
    ) -> Result<Self, SessionError> {
        let config = Self {
            signing_key: signing_key.into(),
            session_duration,
            store_type: StoreType::Memory,
            store_url: DEFAULT_STORE_URL.to_string(),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_key = lookup("SESSION_SIGNING_KEY").unwrap_or_default();

        let duration_secs = match lookup("SESSION_DURATION_SECS") {
            Some(v) => parse_u64("SESSION_DURATION_SECS", &v)?,
            None => DEFAULT_SESSION_DURATION_SECS,
        };

        let store_type = match lookup("SESSION_STORE_TYPE") {
            Some(v) => v.parse()?,
            None => StoreType::Memory,
        };

        let store_timeout_ms = match lookup("SESSION_STORE_TIMEOUT_MS") {
            Some(v) => parse_u64("SESSION_STORE_TIMEOUT_MS", &v)?,
            None => DEFAULT_STORE_TIMEOUT_MS,
        };

        let config = Self {
            signing_key,
            session_duration: Duration::from_secs(duration_secs),
            store_type,
            store_url: lookup("SESSION_STORE_URL").unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            store_timeout: Duration::from_millis(store_timeout_ms),
            key_prefix: lookup("SESSION_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        };
        config.validate()?;

        tracing::debug!("Loaded session configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.signing_key.is_empty() {
            return Err(SessionError::Configuration(
                "SESSION_SIGNING_KEY must be set and non-empty".to_string(),
            ));
        }
        if self.session_duration.is_zero() {
            return Err(SessionError::Configuration(
                "Session duration must be positive".to_string(),
            ));
        }
        if self.session_duration > MAX_SESSION_DURATION {
            return Err(SessionError::Configuration(format!(
                "Session duration must not exceed {} seconds",
                MAX_SESSION_DURATION.as_secs()
            )));
        }
        if self.store_timeout.is_zero() {
            return Err(SessionError::Configuration(
                "Session store timeout must be positive".to_string(),
            ));
        }
        if self.key_prefix.is_empty() {
            return Err(SessionError::Configuration(
                "Session key prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64, SessionError> {
    value.trim().parse().map_err(|_| {
        SessionError::Configuration(format!("{name} must be a non-negative integer, got {value:?}"))
    })
}
