mod config;
mod memory;
mod redis;
mod types;

pub use config::GenericSessionStore;
pub use types::{InMemorySessionStore, RedisSessionStore, SessionStore};
