//! HTTP route handlers.
//!
//! All endpoints speak camelCase JSON. State is the shared
//! [`LeagueService`]; callers are identified by the `x-user-id` header
//! (session issuance lives upstream — an absent header degrades to an
//! anonymous caller that owns nothing).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::league::{LeagueService, StatIngestRow, TeamPatch};
use crate::realtime::LeagueEvent;
use crate::types::{LeagueError, Wager};

/// Shared state accessible by all route handlers.
pub type AppState = Arc<LeagueService>;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Domain error carried to the wire as `{ "error": <message> }`.
pub struct ApiError(LeagueError);

impl From<LeagueError> for ApiError {
    fn from(err: LeagueError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LeagueError::Forbidden => StatusCode::FORBIDDEN,
            LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
            LeagueError::Locked { .. }
            | LeagueError::AlreadyLocked { .. }
            | LeagueError::RevealLocked { .. }
            | LeagueError::CapacityExceeded => StatusCode::CONFLICT,
            LeagueError::InvalidLineup { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LeagueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn caller(headers: &HeaderMap) -> String {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LockBody {
    pub week: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBody {
    pub player_id: String,
    pub week: u32,
}

/// `null` clears the wager.
#[derive(Debug, Deserialize)]
pub struct WagerBody {
    pub value: Option<Wager>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsQuery {
    pub through: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PlayersQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    #[serde(default = "default_league_key")]
    pub league: String,
}

fn default_league_key() -> String {
    "demo".to_string()
}

#[derive(Debug, Serialize)]
pub struct WagersResponse {
    pub week: u32,
    pub wagers: HashMap<String, Wager>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "msg": format!(
            "wildcat v{} — season {}, weeks 1-{}",
            env!("CARGO_PKG_VERSION"),
            state.season(),
            state.max_week()
        ),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_matchup(
    State(state): State<AppState>,
    Path((league_key, week)): Path<(String, u32)>,
) -> Result<Response, ApiError> {
    let view = state.matchup(&league_key, week).await?;
    Ok(Json(view).into_response())
}

pub async fn patch_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<TeamPatch>,
) -> Result<Response, ApiError> {
    let league = state.update_team(&team_id, &caller(&headers), patch).await?;
    Ok(Json(json!({ "ok": true, "league": league })).into_response())
}

pub async fn lock_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<LockBody>,
) -> Result<Response, ApiError> {
    let league = state
        .lock_team(&team_id, &caller(&headers), body.week)
        .await?;
    Ok(Json(json!({ "ok": true, "league": league })).into_response())
}

pub async fn move_player(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<MoveBody>,
) -> Result<Response, ApiError> {
    let league = state
        .move_player(&team_id, &caller(&headers), &body.player_id, body.week)
        .await?;
    Ok(Json(json!({ "ok": true, "league": league })).into_response())
}

pub async fn get_wagers(
    State(state): State<AppState>,
    Path((league_key, week)): Path<(String, u32)>,
) -> Result<Response, ApiError> {
    let sheet = state.wagers(&league_key, week).await?;
    let body = WagersResponse {
        week: sheet.week,
        wagers: sheet.entries,
    };
    Ok(Json(body).into_response())
}

pub async fn put_wager(
    State(state): State<AppState>,
    Path((league_key, week, player_id)): Path<(String, u32, String)>,
    headers: HeaderMap,
    Json(body): Json<WagerBody>,
) -> Result<Response, ApiError> {
    let value = body.value.unwrap_or(Wager::None);
    let sheet = state
        .set_wager(&league_key, &caller(&headers), week, &player_id, value)
        .await?;
    Ok(Json(json!({ "ok": true, "week": sheet.week, "wagers": sheet.entries })).into_response())
}

pub async fn get_standings(
    State(state): State<AppState>,
    Path(league_key): Path<String>,
    Query(q): Query<StandingsQuery>,
) -> Result<Response, ApiError> {
    let through = q.through.unwrap_or(state.max_week());
    let records = state.standings(&league_key, through).await?;
    Ok(Json(records).into_response())
}

pub async fn get_players(
    State(state): State<AppState>,
    Query(q): Query<PlayersQuery>,
) -> Result<Response, ApiError> {
    let pool = state.list_players(q.limit).await?;
    Ok(Json(pool).into_response())
}

pub async fn post_stats(
    State(state): State<AppState>,
    Path(week): Path<u32>,
    Json(rows): Json<Vec<StatIngestRow>>,
) -> Result<Response, ApiError> {
    let updated = state.ingest_stats(week, rows).await?;
    Ok(Json(json!({ "ok": true, "updated": updated })).into_response())
}

// ---------------------------------------------------------------------------
// WebSocket
// ---------------------------------------------------------------------------

/// Upgrade to a websocket streaming the league's events, one JSON text
/// frame per event. The league is resolved before the upgrade so an
/// unknown key still gets a proper 404.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(q): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let rx = state.subscribe(&q.league).await?;
    debug!(league = %q.league, "Websocket subscriber connected");
    Ok(ws.on_upgrade(move |socket| stream_events(socket, rx)))
}

async fn stream_events(socket: WebSocket, mut rx: broadcast::Receiver<LeagueEvent>) {
    let (mut sender, mut receiver) = socket.split();

    let forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                // A lagged subscriber just misses events; the client
                // re-fetches on the next one anyway.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Websocket subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Inbound frames are ignored; the channel is push-only.
    while let Some(Ok(msg)) = receiver.next().await {
        if matches!(msg, Message::Close(_)) {
            break;
        }
    }
    forward.abort();
    debug!("Websocket subscriber disconnected");
}
