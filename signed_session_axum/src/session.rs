use std::marker::PhantomData;

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use http::request::Parts;
use serde::de::DeserializeOwned;

use signed_session::{GenericSessionStore, SessionId, SessionStore, get_session_id};

use super::context::{SessionContext, SigningKey};
use super::error::AuthRejection;

/// A request whose bearer credential carries a validly signed session id.
///
/// Only the signature is checked; the store is not consulted.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub session_id: SessionId,
}

impl<B> FromRequestParts<B> for AuthSession
where
    SigningKey: FromRef<B>,
    B: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        let signing_key = SigningKey::from_ref(state);
        let session_id = get_session_id(&parts.headers, &parts.uri, signing_key.as_str())?;
        Ok(AuthSession { session_id })
    }
}

impl<B> OptionalFromRequestParts<B> for AuthSession
where
    SigningKey: FromRef<B>,
    B: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &B,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthSession as FromRequestParts<B>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}

/// A validated session together with its stored state.
///
/// Extracting this refreshes the session's lifetime in the store. `S` names
/// the store type held in the router's [`SessionContext`].
pub struct AuthState<T, S = GenericSessionStore> {
    pub session_id: SessionId,
    pub state: T,
    _store: PhantomData<fn() -> S>,
}

impl<T, S> AuthState<T, S> {
    pub fn into_parts(self) -> (SessionId, T) {
        (self.session_id, self.state)
    }
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for AuthState<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .finish()
    }
}

impl<T, S, B> FromRequestParts<B> for AuthState<T, S>
where
    T: DeserializeOwned + Send,
    S: SessionStore,
    SessionContext<S>: FromRef<B>,
    B: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        let context = SessionContext::<S>::from_ref(state);
        let session_id =
            get_session_id(&parts.headers, &parts.uri, context.signing_key.as_str())?;
        let payload: T = context
            .store
            .get(&session_id)
            .await
            .map_err(|e| AuthRejection(e.into()))?;

        tracing::trace!("Loaded session state for authenticated request");
        Ok(AuthState {
            session_id,
            state: payload,
            _store: PhantomData,
        })
    }
}
