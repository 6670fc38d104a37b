use axum::{
    Router,
    routing::{get, post},
};

use signed_session_axum::{SessionConfig, SessionContext};

mod handlers;
mod server;

use crate::handlers::{login, logout, me};

pub(crate) type AppStore = signed_session_axum::GenericSessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::init_tracing(env!("CARGO_CRATE_NAME"));

    let config = SessionConfig::from_env()?;
    let ctx = SessionContext::from_config(&config).await?;

    let app = Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
        .with_state(ctx);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    server::serve(port, app).await?;
    Ok(())
}
