//! Realtime fan-out.
//!
//! One broadcast channel per league, created lazily on first
//! subscribe. Mutations publish after their write lands; delivery is
//! lossy best-effort (a slow websocket lags, it never blocks the write
//! path). Wager changes are deliberately not published — calls stay
//! private to their owner until reveal.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Buffered events per league channel before laggards start dropping.
pub const CHANNEL_CAPACITY: usize = 64;

/// Wire names follow the `topic:verb` convention the client listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "lineup:update")]
    LineupUpdate,
    #[serde(rename = "score:update")]
    ScoreUpdate,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::LineupUpdate => write!(f, "lineup:update"),
            EventKind::ScoreUpdate => write!(f, "score:update"),
        }
    }
}

/// A thin change notification. Carries ids only — subscribers re-fetch
/// whatever view they render, so stale events are harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEvent {
    pub event: EventKind,
    pub league_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
}

impl LeagueEvent {
    pub fn lineup_update(league_id: &str, team_id: &str, week: Option<u32>) -> Self {
        Self {
            event: EventKind::LineupUpdate,
            league_id: league_id.to_string(),
            team_id: Some(team_id.to_string()),
            week,
        }
    }

    pub fn score_update(league_id: &str, week: u32) -> Self {
        Self {
            event: EventKind::ScoreUpdate,
            league_id: league_id.to_string(),
            team_id: None,
            week: Some(week),
        }
    }
}

/// Abstraction over event delivery, so the league service can be
/// tested without a socket in sight.
#[async_trait]
pub trait RealtimeNotifier: Send + Sync {
    /// Publish an event to its league's channel. Returns how many
    /// subscribers received it; zero when nobody is listening.
    async fn publish(&self, event: LeagueEvent) -> usize;

    /// Subscribe to a league's channel.
    async fn subscribe(&self, league_id: &str) -> broadcast::Receiver<LeagueEvent>;
}

/// In-process fan-out over tokio broadcast channels.
#[derive(Default)]
pub struct BroadcastNotifier {
    channels: RwLock<HashMap<String, broadcast::Sender<LeagueEvent>>>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RealtimeNotifier for BroadcastNotifier {
    async fn publish(&self, event: LeagueEvent) -> usize {
        let channels = self.channels.read().await;
        let delivered = match channels.get(&event.league_id) {
            // send() errors only when no receiver is left; that is not
            // a failure here, just an empty room.
            Some(sender) => sender.send(event.clone()).unwrap_or(0),
            None => 0,
        };
        debug!(
            league_id = %event.league_id,
            kind = %event.event,
            delivered,
            "Event published"
        );
        delivered
    }

    async fn subscribe(&self, league_id: &str) -> broadcast::Receiver<LeagueEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(league_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
