use std::sync::Once;
use std::time::Duration;

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use signed_session::RedisSessionStore;

pub const TEST_SIGNING_KEY: &str = "integration-test-signing-key";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestProfile {
    pub user_id: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

impl TestProfile {
    pub fn alice() -> Self {
        Self {
            user_id: "user-alice".to_string(),
            display_name: "Alice".to_string(),
            roles: vec!["admin".to_string()],
        }
    }
}

pub fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

pub fn bearer_headers(credential: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(credential).expect("valid header value"),
    );
    headers
}

/// Connect to the Redis server named by `SESSION_TEST_REDIS_URL`, or `None`
/// when the variable is unset.
pub async fn test_redis_store(session_duration: Duration) -> Option<RedisSessionStore> {
    init_test_environment();
    let url = std::env::var("SESSION_TEST_REDIS_URL").ok()?;
    let store = RedisSessionStore::connect(&url, session_duration, Duration::from_secs(2))
        .await
        .expect("SESSION_TEST_REDIS_URL must point at a reachable Redis server")
        .with_key_prefix("signed-session-test:sid:");
    Some(store)
}
