mod config;
mod errors;
mod main;
mod types;

pub use config::{AUTH_QUERY_PARAM, SCHEME_BEARER};
pub use errors::SessionError;
pub use main::{
    begin_session, end_session, extract_bearer_token, get_session_id, get_state, mint_session_id,
    validate_session_id,
};
pub use types::SessionId;
