use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use clap::Parser;
use serde_json::json;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use quire::auth::{session, users};
use quire::config::{Cli, Config};
use quire::error::{AppError, AppResult};
use quire::state::AppState;
use quire::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;

    let state = AppState::new(pool, config.clone());

    let mut app = routes::app(state.clone());

    // Test-only seed endpoint: creates a user + session, returns session cookie
    if std::env::var("QUIRE_TEST_SEED").is_ok() {
        tracing::warn!("QUIRE_TEST_SEED is set; mounting /test/seed");
        app = app.merge(
            axum::Router::new()
                .route("/test/seed", get(test_seed))
                .layer(TraceLayer::new_for_http())
                .with_state(state),
        );
    }

    // Start server
    let addr: SocketAddr = config.listen_addr().parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Test-only: seed a user + session and return the session cookie.
/// Only mounted when QUIRE_TEST_SEED env var is set.
async fn test_seed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let internal = |e: anyhow::Error| AppError::Internal(e.to_string());

    let user = match users::find_by_username(&state.db, "testuser").map_err(internal)? {
        Some(user) => user,
        None => users::create_user(&state.db, "testuser").map_err(internal)?,
    };

    let token = session::create_session(&state.db, &user.id, state.config.auth.session_hours)
        .map_err(internal)?;

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=3600",
        state.config.auth.cookie_name, token
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user_id": user.id, "username": user.username, "token": token })),
    ))
}
