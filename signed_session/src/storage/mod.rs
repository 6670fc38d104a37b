mod errors;
mod session_store;
mod types;

pub use errors::StorageError;
pub use session_store::{
    GenericSessionStore, InMemorySessionStore, RedisSessionStore, SessionStore,
};
pub use types::DEFAULT_KEY_PREFIX;
