mod request;
mod signer;

pub use request::{begin_session, end_session, extract_bearer_token, get_session_id, get_state};
pub use signer::{mint_session_id, validate_session_id};
