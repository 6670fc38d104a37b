//! signed-session - Signed stateless session identifiers and session state storage
//!
//! A session identifier is 32 random bytes followed by their HMAC-SHA256
//! under a server-side signing key, encoded as URL-safe base64. Any process
//! holding the key can validate an identifier without consulting shared
//! state. Session state is an arbitrary serializable payload kept in a
//! [`SessionStore`], whose entries expire after a period of inactivity and are
//! refreshed on every read.
//!
//! ```no_run
//! use std::time::Duration;
//! use http::HeaderMap;
//! use signed_session::{InMemorySessionStore, begin_session, get_state};
//!
//! # async fn example() -> Result<(), signed_session::SessionError> {
//! let store = InMemorySessionStore::new(Duration::from_secs(600));
//! let mut response_headers = HeaderMap::new();
//! let id = begin_session("signing-key", &store, &"alice", &mut response_headers).await?;
//!
//! // ...later, on a request carrying `Authorization: Bearer <id>`
//! # let request_headers = response_headers.clone();
//! # let uri: http::Uri = "/me".parse().unwrap();
//! let (_, user): (_, String) = get_state(&request_headers, &uri, "signing-key", &store).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod session;
mod storage;
mod utils;

pub use config::{SessionConfig, StoreType};

pub use session::{
    AUTH_QUERY_PARAM, SCHEME_BEARER, SessionError, SessionId, begin_session, end_session,
    extract_bearer_token, get_session_id, get_state, mint_session_id, validate_session_id,
};

pub use storage::{
    DEFAULT_KEY_PREFIX, GenericSessionStore, InMemorySessionStore, RedisSessionStore,
    SessionStore, StorageError,
};

pub use utils::UtilError;
