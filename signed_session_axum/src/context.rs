use std::sync::Arc;

use axum::extract::FromRef;
use http::{HeaderMap, Uri};
use serde::Serialize;

use signed_session::{
    GenericSessionStore, SessionConfig, SessionError, SessionId, SessionStore, StorageError,
    begin_session, end_session,
};

/// The server-side signing key, shareable across handlers.
#[derive(Clone)]
pub struct SigningKey(Arc<str>);

impl SigningKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Signing key plus the shared session store, held in router state.
pub struct SessionContext<S> {
    pub signing_key: SigningKey,
    pub store: Arc<S>,
}

impl<S> Clone for SessionContext<S> {
    fn clone(&self) -> Self {
        Self {
            signing_key: self.signing_key.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S> FromRef<SessionContext<S>> for SigningKey {
    fn from_ref(context: &SessionContext<S>) -> Self {
        context.signing_key.clone()
    }
}

impl<S: SessionStore> SessionContext<S> {
    pub fn new(signing_key: impl AsRef<str>, store: S) -> Self {
        Self {
            signing_key: SigningKey::new(signing_key),
            store: Arc::new(store),
        }
    }

    /// Start a session for `state`. The returned headers carry
    /// `Authorization: Bearer <id>` for the response.
    pub async fn begin<T>(&self, state: &T) -> Result<(SessionId, HeaderMap), SessionError>
    where
        T: Serialize + Sync,
    {
        let mut headers = HeaderMap::new();
        let session_id = begin_session(
            self.signing_key.as_str(),
            self.store.as_ref(),
            state,
            &mut headers,
        )
        .await?;
        Ok((session_id, headers))
    }

    /// Replace the state stored for an already validated session.
    pub async fn update<T>(&self, session_id: &SessionId, state: &T) -> Result<(), SessionError>
    where
        T: Serialize + Sync,
    {
        self.store.save(session_id, state).await?;
        Ok(())
    }

    /// Validate the request's credential and delete the session state.
    pub async fn end(&self, headers: &HeaderMap, uri: &Uri) -> Result<SessionId, SessionError> {
        end_session(headers, uri, self.signing_key.as_str(), self.store.as_ref()).await
    }
}

impl SessionContext<GenericSessionStore> {
    /// Build the store named by `config` and wrap it with the signing key.
    pub async fn from_config(config: &SessionConfig) -> Result<Self, StorageError> {
        let store = GenericSessionStore::from_config(config).await?;
        Ok(Self::new(&config.signing_key, store))
    }
}
