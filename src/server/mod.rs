//! HTTP server — Axum surface over the league service.
//!
//! REST routes for matchups, team mutations, wagers, standings, and
//! stat ingest, plus the websocket event stream. CORS is open for
//! local clients.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-user-id")]);

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/matchups/:league/week/:week", get(routes::get_matchup))
        .route("/teams/:team", patch(routes::patch_team))
        .route("/teams/:team/lock", patch(routes::lock_team))
        .route("/teams/:team/move", post(routes::move_player))
        .route("/wagers/:league/week/:week", get(routes::get_wagers))
        .route(
            "/wagers/:league/week/:week/player/:player",
            put(routes::put_wager),
        )
        .route("/standings/:league", get(routes::get_standings))
        .route("/players", get(routes::get_players))
        .route("/stats/week/:week", post(routes::post_stats))
        .route("/ws", get(routes::ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the server until a shutdown signal arrives.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind port {port}"))?;
    info!(port, "Server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            // Without a signal handler the server just runs until killed
            warn!(%err, "Failed to install shutdown handler");
            std::future::pending::<()>().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
