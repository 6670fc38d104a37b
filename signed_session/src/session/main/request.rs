use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use http::Uri;
use serde::{Serialize, de::DeserializeOwned};

use crate::session::config::{AUTH_QUERY_PARAM, SCHEME_BEARER};
use crate::session::errors::SessionError;
use crate::session::types::SessionId;
use crate::storage::SessionStore;

use super::signer::{mint_session_id, validate_session_id};

/// Pull the raw bearer token out of a request.
///
/// The `Authorization` header is consulted first; the `auth` query parameter
/// is used when the header is absent or empty. Either source must hold
/// exactly `Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap, uri: &Uri) -> Result<String, SessionError> {
    let header_credential = match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|e| {
            tracing::debug!("Authorization header is not visible ASCII: {}", e);
            SessionError::InvalidScheme
        })?,
        None => "",
    };

    let credential = if header_credential.is_empty() {
        tracing::debug!(
            "No Authorization credential, checking '{}' query parameter",
            AUTH_QUERY_PARAM
        );
        query_credential(uri).unwrap_or_default()
    } else {
        header_credential.to_string()
    };

    parse_bearer(&credential).map(str::to_string)
}

fn query_credential(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == AUTH_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

fn parse_bearer(credential: &str) -> Result<&str, SessionError> {
    let parts: Vec<&str> = credential.split(' ').collect();
    match parts.as_slice() {
        [] | [""] => Err(SessionError::NoSessionId),
        [scheme, token] if *scheme == SCHEME_BEARER && !token.is_empty() => Ok(*token),
        _ => {
            tracing::debug!("Rejecting credential with unsupported scheme or shape");
            Err(SessionError::InvalidScheme)
        }
    }
}

/// Extract and validate the session identifier carried by a request.
pub fn get_session_id(
    headers: &HeaderMap,
    uri: &Uri,
    signing_key: &str,
) -> Result<SessionId, SessionError> {
    let token = extract_bearer_token(headers, uri)?;
    validate_session_id(&token, signing_key)
}

/// Start a new session: mint an identifier, persist `state` under it, and add
/// `Authorization: Bearer <id>` to `response_headers`.
pub async fn begin_session<S, T>(
    signing_key: &str,
    store: &S,
    state: &T,
    response_headers: &mut HeaderMap,
) -> Result<SessionId, SessionError>
where
    S: SessionStore,
    T: Serialize + Sync,
{
    let session_id = mint_session_id(signing_key)?;
    store.save(&session_id, state).await?;

    let value = HeaderValue::from_str(&format!("{SCHEME_BEARER} {session_id}"))
        .map_err(|e| SessionError::Header(e.to_string()))?;
    response_headers.append(AUTHORIZATION, value);

    tracing::debug!("Began new session");
    Ok(session_id)
}

/// Validate the request's session identifier and load its state. A successful
/// load extends the session's lifetime in the store.
pub async fn get_state<S, T>(
    headers: &HeaderMap,
    uri: &Uri,
    signing_key: &str,
    store: &S,
) -> Result<(SessionId, T), SessionError>
where
    S: SessionStore,
    T: DeserializeOwned + Send,
{
    let session_id = get_session_id(headers, uri, signing_key)?;
    let state = store.get(&session_id).await?;
    Ok((session_id, state))
}

/// Validate the request's session identifier and delete its state.
pub async fn end_session<S>(
    headers: &HeaderMap,
    uri: &Uri,
    signing_key: &str,
    store: &S,
) -> Result<SessionId, SessionError>
where
    S: SessionStore,
{
    let session_id = get_session_id(headers, uri, signing_key)?;
    store.delete(&session_id).await?;
    tracing::debug!("Ended session");
    Ok(session_id)
}
