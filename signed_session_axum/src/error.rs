use axum::response::{IntoResponse, Response};
use http::header::WWW_AUTHENTICATE;
use http::{HeaderValue, StatusCode};
use signed_session::SessionError;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

fn response_parts(error: &SessionError) -> (StatusCode, String) {
    if error.is_unauthenticated() {
        tracing::debug!("Unauthenticated request: {}", error);
        (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
    } else {
        tracing::error!("Session failure: {}", error);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

/// Credential problems become 401; store outages and other server faults
/// become 500 without exposing details to the client.
impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| response_parts(&e))
    }
}

/// Rejection produced by the session extractors.
#[derive(Debug)]
pub struct AuthRejection(pub SessionError);

impl From<SessionError> for AuthRejection {
    fn from(error: SessionError) -> Self {
        Self(error)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let mut response = response_parts(&self.0).into_response();
        if self.0.is_unauthenticated() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
