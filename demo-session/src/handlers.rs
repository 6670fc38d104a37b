use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::{HeaderMap, StatusCode, Uri};
use serde::{Deserialize, Serialize};

use signed_session_axum::{AuthState, IntoResponseError, SessionContext};

use crate::AppStore;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) user_name: String,
}

/// What the demo keeps per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DemoSession {
    pub(crate) user_name: String,
    pub(crate) request_count: u64,
}

/// Credential checking is out of scope here; any non-empty name logs in.
pub(crate) async fn login(
    State(ctx): State<SessionContext<AppStore>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if body.user_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "user_name is required".to_string()));
    }

    let session = DemoSession {
        user_name: body.user_name,
        request_count: 0,
    };
    let (_, headers) = ctx.begin(&session).await.into_response_error()?;
    tracing::info!("User {} logged in", session.user_name);

    Ok((StatusCode::CREATED, headers, Json(session)))
}

pub(crate) async fn me(
    State(ctx): State<SessionContext<AppStore>>,
    auth: AuthState<DemoSession, AppStore>,
) -> Result<Json<DemoSession>, (StatusCode, String)> {
    let (session_id, mut session) = auth.into_parts();
    session.request_count += 1;
    ctx.update(&session_id, &session).await.into_response_error()?;
    Ok(Json(session))
}

pub(crate) async fn logout(
    State(ctx): State<SessionContext<AppStore>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<StatusCode, (StatusCode, String)> {
    ctx.end(&headers, &uri).await.into_response_error()?;
    Ok(StatusCode::NO_CONTENT)
}
