use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use http::header::{AUTHORIZATION, HeaderMap};
use http::Uri;
use serde_json::{Value, json};
use signed_session::{
    GenericSessionStore, InMemorySessionStore, SessionConfig, SessionError, SessionId,
    SessionStore, StorageError, begin_session, end_session, get_session_id, get_state,
    mint_session_id, validate_session_id,
};

use crate::common::{TEST_SIGNING_KEY, TestProfile, bearer_headers};

fn uri(s: &str) -> Uri {
    s.parse().expect("valid uri")
}

/// Login, authenticated request, logout, rejected request
#[tokio::test]
async fn test_full_session_lifecycle() {
    let store = InMemorySessionStore::new(Duration::from_secs(600));

    // Login
    let mut response_headers = HeaderMap::new();
    let id = begin_session(
        TEST_SIGNING_KEY,
        &store,
        &TestProfile::alice(),
        &mut response_headers,
    )
    .await
    .expect("login succeeds");
    let credential = response_headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .expect("response carries Authorization")
        .to_string();

    // Authenticated request
    let request_headers = bearer_headers(&credential);
    let (got_id, profile): (SessionId, TestProfile) =
        get_state(&request_headers, &uri("/me"), TEST_SIGNING_KEY, &store)
            .await
            .expect("state loads");
    assert_eq!(got_id, id);
    assert_eq!(profile, TestProfile::alice());

    // Logout
    end_session(&request_headers, &uri("/logout"), TEST_SIGNING_KEY, &store)
        .await
        .expect("logout succeeds");

    // The token still verifies, but no state remains behind it
    assert_eq!(
        get_session_id(&request_headers, &uri("/me"), TEST_SIGNING_KEY),
        Ok(id)
    );
    let result: Result<(SessionId, TestProfile), _> =
        get_state(&request_headers, &uri("/me"), TEST_SIGNING_KEY, &store).await;
    let error = result.unwrap_err();
    assert_eq!(error, SessionError::Storage(StorageError::StateNotFound));
    assert!(error.is_unauthenticated());
}

/// A token minted by one process validates in another holding the same key
#[test]
fn test_validation_needs_only_the_key() {
    let id = mint_session_id(TEST_SIGNING_KEY).unwrap();
    let text = id.as_str().to_string();
    drop(id);

    let validated = validate_session_id(&text, TEST_SIGNING_KEY).unwrap();
    assert_eq!(validated.as_str(), text);

    assert_eq!(
        validate_session_id(&text, "rotated-signing-key"),
        Err(SessionError::SignatureMismatch)
    );
}

#[tokio::test]
async fn test_query_parameter_fallback() {
    let store = InMemorySessionStore::new(Duration::from_secs(600));
    let mut response_headers = HeaderMap::new();
    let id = begin_session(TEST_SIGNING_KEY, &store, &json!({"x": 1}), &mut response_headers)
        .await
        .unwrap();

    let request_uri = uri(&format!("/ws?auth=Bearer%20{id}"));
    let (got_id, state): (SessionId, Value) =
        get_state(&HeaderMap::new(), &request_uri, TEST_SIGNING_KEY, &store)
            .await
            .unwrap();
    assert_eq!(got_id, id);
    assert_eq!(state, json!({"x": 1}));
}

#[tokio::test]
async fn test_rejections_map_to_unauthenticated() {
    let store = InMemorySessionStore::new(Duration::from_secs(600));
    let forged = mint_session_id("attacker-key").unwrap();

    let cases = [
        (bearer_headers("Basic dXNlcjpwYXNz"), SessionError::InvalidScheme),
        (bearer_headers("Bearer not-base64!!"), SessionError::MalformedToken(String::new())),
        (bearer_headers("Bearer AA=="), SessionError::MalformedToken(String::new())),
        (bearer_headers(&format!("Bearer {forged}")), SessionError::SignatureMismatch),
        (HeaderMap::new(), SessionError::NoSessionId),
    ];

    for (headers, expected) in cases {
        let result: Result<(SessionId, Value), _> =
            get_state(&headers, &uri("/me"), TEST_SIGNING_KEY, &store).await;
        let error = result.unwrap_err();
        assert_eq!(
            std::mem::discriminant(&error),
            std::mem::discriminant(&expected),
            "{error:?}"
        );
        assert!(error.is_unauthenticated());
    }
}

#[tokio::test]
async fn test_generic_store_from_config() {
    let config = SessionConfig::new(TEST_SIGNING_KEY, Duration::from_secs(60)).unwrap();
    let store = GenericSessionStore::from_config(&config).await.unwrap();

    let mut response_headers = HeaderMap::new();
    let id = begin_session(
        &config.signing_key,
        &store,
        &json!({"cart": [1, 2, 3]}),
        &mut response_headers,
    )
    .await
    .unwrap();

    let out: Value = store.get(&id).await.unwrap();
    assert_eq!(out, json!({"cart": [1, 2, 3]}));
}

/// Many tasks mint and use sessions concurrently against one shared store
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sessions() {
    let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(600)));

    let mut handles = Vec::new();
    for n in 0..32u32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut response_headers = HeaderMap::new();
            let id = begin_session(
                TEST_SIGNING_KEY,
                store.as_ref(),
                &json!({ "n": n }),
                &mut response_headers,
            )
            .await?;
            let out: Value = store.get(&id).await?;
            assert_eq!(out, json!({ "n": n }));
            Ok::<SessionId, SessionError>(id)
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let id = handle.await.unwrap().unwrap();
        assert!(seen.insert(id), "identifiers must be unique");
    }
    assert_eq!(seen.len(), 32);
}
