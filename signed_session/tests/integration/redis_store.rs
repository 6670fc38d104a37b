use std::time::Duration;

use serde_json::{Value, json};
use signed_session::{SessionId, SessionStore, StorageError, mint_session_id};

use crate::common::{TEST_SIGNING_KEY, TestProfile, test_redis_store};

const DURATION: Duration = Duration::from_secs(120);

fn new_id() -> SessionId {
    mint_session_id(TEST_SIGNING_KEY).unwrap()
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_lifecycle() {
    let Some(store) = test_redis_store(DURATION).await else {
        eprintln!("SESSION_TEST_REDIS_URL not set, skipping");
        return;
    };
    let id = new_id();

    // Save then get
    store.save(&id, &json!({"x": 1})).await.unwrap();
    let out: Value = store.get(&id).await.unwrap();
    assert_eq!(out, json!({"x": 1}));

    // Delete then get
    store.delete(&id).await.unwrap();
    let result: Result<Value, _> = store.get(&id).await;
    assert_eq!(result, Err(StorageError::StateNotFound));

    // Deleting a missing key succeeds
    assert!(store.delete(&id).await.is_ok());
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_get_never_saved() {
    let Some(store) = test_redis_store(DURATION).await else {
        return;
    };
    let result: Result<TestProfile, _> = store.get(&new_id()).await;
    assert_eq!(result, Err(StorageError::StateNotFound));
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_save_sets_ttl() {
    let Some(store) = test_redis_store(DURATION).await else {
        return;
    };
    let id = new_id();
    store.save(&id, &TestProfile::alice()).await.unwrap();

    let remaining = store.remaining_ttl(&id).await.unwrap().expect("key has a TTL");
    assert!(remaining <= DURATION);
    assert!(remaining > DURATION - Duration::from_secs(5));

    store.delete(&id).await.unwrap();
    assert_eq!(store.remaining_ttl(&id).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_get_refreshes_ttl() {
    let Some(store) = test_redis_store(Duration::from_secs(4)).await else {
        return;
    };
    let id = new_id();
    store.save(&id, &json!({"x": 1})).await.unwrap();

    // Let the TTL run down, then read
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let before = store.remaining_ttl(&id).await.unwrap().unwrap();
    assert!(before <= Duration::from_millis(2600));

    let _: Value = store.get(&id).await.unwrap();
    let after = store.remaining_ttl(&id).await.unwrap().unwrap();
    assert!(after > Duration::from_millis(3500), "ttl was {after:?}");

    store.delete(&id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_expired_entry_not_found() {
    let Some(store) = test_redis_store(Duration::from_millis(300)).await else {
        return;
    };
    let id = new_id();
    store.save(&id, &json!({"x": 1})).await.unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;
    let result: Result<Value, _> = store.get(&id).await;
    assert_eq!(result, Err(StorageError::StateNotFound));
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_corrupt_payload_is_decode_error() {
    let Some(store) = test_redis_store(DURATION).await else {
        return;
    };
    let id = new_id();
    store.save(&id, &json!({"unexpected": true})).await.unwrap();

    let result: Result<TestProfile, _> = store.get(&id).await;
    assert!(matches!(result, Err(StorageError::Decode(_))));

    store.delete(&id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a Redis server at SESSION_TEST_REDIS_URL"]
async fn test_redis_back_to_back_gets() {
    let Some(store) = test_redis_store(Duration::from_secs(2)).await else {
        return;
    };
    let id = new_id();
    store.save(&id, &json!({"x": 1})).await.unwrap();

    // Each read extends the entry, so reads spaced under the duration keep it alive
    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(800)).await;
        let out: Value = store.get(&id).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    store.delete(&id).await.unwrap();
}
