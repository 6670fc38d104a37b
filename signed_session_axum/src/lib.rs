//! Axum integration for signed-session
//!
//! Put a [`SessionContext`] in the router state (or make it reachable through
//! `FromRef`), then use [`AuthSession`] or [`AuthState`] as extractors in
//! handlers that require an authenticated caller.

mod context;
mod error;
mod session;

pub use context::{SessionContext, SigningKey};
pub use error::{AuthRejection, IntoResponseError};
pub use session::{AuthSession, AuthState};

pub use signed_session::{
    GenericSessionStore, SessionConfig, SessionError, SessionId, SessionStore, StorageError,
};
