//! In-memory store backend.
//!
//! Holds the whole dataset behind one `RwLock`; the canonical backend
//! for tests and demo runs. [`StoreData`] is shared with the file
//! backend, which serializes it wholesale.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::store::{LeagueStore, StoreError};
use crate::types::{League, Player, WagerSheet};

/// The full persisted dataset.
///
/// Leagues and players are kept in insertion order; wager sheets are
/// keyed by `league_id:week`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreData {
    #[serde(default)]
    pub leagues: Vec<League>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub wager_sheets: HashMap<String, WagerSheet>,
}

impl StoreData {
    pub(crate) fn sheet_key(league_id: &str, week: u32) -> String {
        format!("{league_id}:{week}")
    }

    pub(crate) fn league(&self, league_id: &str) -> Result<League, StoreError> {
        self.leagues
            .iter()
            .find(|l| l.id == league_id)
            .cloned()
            .ok_or_else(|| StoreError::LeagueNotFound(format!("league {league_id}")))
    }

    pub(crate) fn league_by_team(&self, team_id: &str) -> Result<League, StoreError> {
        self.leagues
            .iter()
            .find(|l| l.team(team_id).is_some())
            .cloned()
            .ok_or_else(|| StoreError::LeagueNotFound(format!("league for team {team_id}")))
    }

    pub(crate) fn insert_league(&mut self, league: League) {
        match self.leagues.iter_mut().find(|l| l.id == league.id) {
            Some(slot) => *slot = league,
            None => self.leagues.push(league),
        }
    }

    pub(crate) fn put_league(&mut self, league: &League) -> Result<u64, StoreError> {
        let stored = self
            .leagues
            .iter_mut()
            .find(|l| l.id == league.id)
            .ok_or_else(|| StoreError::LeagueNotFound(format!("league {}", league.id)))?;
        if stored.version != league.version {
            return Err(StoreError::VersionConflict {
                league_id: league.id.clone(),
                expected: league.version,
                found: stored.version,
            });
        }
        let mut next = league.clone();
        next.version += 1;
        let version = next.version;
        *stored = next;
        Ok(version)
    }

    pub(crate) fn player(&self, player_id: &str) -> Option<Player> {
        self.players.iter().find(|p| p.id == player_id).cloned()
    }

    pub(crate) fn players_by_id(&self, ids: &[String]) -> HashMap<String, Player> {
        ids.iter()
            .filter_map(|id| self.player(id).map(|p| (id.clone(), p)))
            .collect()
    }

    pub(crate) fn put_player(&mut self, player: Player) {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(slot) => *slot = player,
            None => self.players.push(player),
        }
    }

    pub(crate) fn wager_sheet(&self, league_id: &str, week: u32) -> WagerSheet {
        self.wager_sheets
            .get(&Self::sheet_key(league_id, week))
            .cloned()
            .unwrap_or_else(|| WagerSheet::new(league_id, week))
    }

    pub(crate) fn put_wager_sheet(&mut self, sheet: WagerSheet) {
        let key = Self::sheet_key(&sheet.league_id, sheet.week);
        self.wager_sheets.insert(key, sheet);
    }
}

/// Volatile backend; everything is lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeagueStore for MemoryStore {
    async fn league(&self, league_id: &str) -> Result<League, StoreError> {
        self.data.read().await.league(league_id)
    }

    async fn leagues(&self) -> Result<Vec<League>, StoreError> {
        Ok(self.data.read().await.leagues.clone())
    }

    async fn league_by_team(&self, team_id: &str) -> Result<League, StoreError> {
        self.data.read().await.league_by_team(team_id)
    }

    async fn insert_league(&self, league: League) -> Result<(), StoreError> {
        self.data.write().await.insert_league(league);
        Ok(())
    }

    async fn put_league(&self, league: &League) -> Result<u64, StoreError> {
        self.data.write().await.put_league(league)
    }

    async fn player(&self, player_id: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.data.read().await.player(player_id))
    }

    async fn players(&self, ids: &[String]) -> Result<HashMap<String, Player>, StoreError> {
        Ok(self.data.read().await.players_by_id(ids))
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.data.read().await.players.clone())
    }

    async fn put_player(&self, player: Player) -> Result<(), StoreError> {
        self.data.write().await.put_player(player);
        Ok(())
    }

    async fn wager_sheet(&self, league_id: &str, week: u32) -> Result<WagerSheet, StoreError> {
        Ok(self.data.read().await.wager_sheet(league_id, week))
    }

    async fn put_wager_sheet(&self, sheet: WagerSheet) -> Result<(), StoreError> {
        self.data.write().await.put_wager_sheet(sheet);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
