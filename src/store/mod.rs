//! Persistence layer.
//!
//! Leagues, the player pool, and weekly wager sheets behind one
//! [`LeagueStore`] seam. Two backends ship: an in-memory store for
//! tests and demos, and a JSON-file store that writes through on every
//! mutation. SQLite can slot in behind the same trait later; JSON is
//! sufficient for single-process deployments.
//!
//! League replacement is version-guarded: `put_league` only applies
//! when the caller's document version matches the stored one, so two
//! concurrent edits of the same league cannot silently overwrite each
//! other.

pub mod file;
pub mod memory;
pub mod seed;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{League, LeagueError, Player, WagerSheet};

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    LeagueNotFound(String),

    #[error("version conflict on league {league_id}: expected v{expected}, found v{found}")]
    VersionConflict {
        league_id: String,
        expected: u64,
        found: u64,
    },

    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for LeagueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LeagueNotFound(what) => LeagueError::NotFound(what),
            other => LeagueError::Storage(other.to_string()),
        }
    }
}

/// Abstraction over league persistence backends.
///
/// Reads hand out owned copies; mutations go through whole-document
/// writes so a league is always replaced atomically.
#[async_trait]
pub trait LeagueStore: Send + Sync {
    /// Fetch one league by id.
    async fn league(&self, league_id: &str) -> Result<League, StoreError>;

    /// All leagues, in insertion order.
    async fn leagues(&self) -> Result<Vec<League>, StoreError>;

    /// The league containing a team.
    async fn league_by_team(&self, team_id: &str) -> Result<League, StoreError>;

    /// Insert a new league document (version as given).
    async fn insert_league(&self, league: League) -> Result<(), StoreError>;

    /// Replace a league document, guarded by its version.
    ///
    /// Applies only when `league.version` matches the stored version,
    /// then bumps it; returns the new version. A mismatch returns
    /// [`StoreError::VersionConflict`] and leaves the stored document
    /// untouched.
    async fn put_league(&self, league: &League) -> Result<u64, StoreError>;

    /// Fetch one player from the pool.
    async fn player(&self, player_id: &str) -> Result<Option<Player>, StoreError>;

    /// Fetch a set of players keyed by id; unknown ids are skipped.
    async fn players(&self, ids: &[String]) -> Result<HashMap<String, Player>, StoreError>;

    /// The whole player pool.
    async fn list_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Insert or replace a player.
    async fn put_player(&self, player: Player) -> Result<(), StoreError>;

    /// The wager sheet for a (league, week); an empty sheet if none
    /// has been written yet.
    async fn wager_sheet(&self, league_id: &str, week: u32) -> Result<WagerSheet, StoreError>;

    /// Replace a wager sheet.
    async fn put_wager_sheet(&self, sheet: WagerSheet) -> Result<(), StoreError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
