//! JSON-file store backend.
//!
//! Same dataset as the memory backend, written through to a single
//! JSON file on every mutation. Loads are served from memory; the file
//! is only read once at startup. Good enough for a single-process
//! deployment where the league fits in a few kilobytes.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::store::memory::StoreData;
use crate::store::{LeagueStore, StoreError};
use crate::types::{League, Player, WagerSheet};

pub struct FileStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl FileStore {
    /// Open a store file, starting fresh if it does not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            let data: StoreData = serde_json::from_str(&json)?;
            info!(
                path = %path.display(),
                leagues = data.leagues.len(),
                players = data.players.len(),
                "Store loaded from disk"
            );
            data
        } else {
            info!(path = %path.display(), "No store file found, starting fresh");
            StoreData::default()
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Store saved");
        Ok(())
    }
}

#[async_trait]
impl LeagueStore for FileStore {
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
        let mut data = self.data.write().await;
        data.insert_league(league);
        self.persist(&data)
    }

    async fn put_league(&self, league: &League) -> Result<u64, StoreError> {
        let mut data = self.data.write().await;
        let version = data.put_league(league)?;
        self.persist(&data)?;
        Ok(version)
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
        let mut data = self.data.write().await;
        data.put_player(player);
        self.persist(&data)
    }

    async fn wager_sheet(&self, league_id: &str, week: u32) -> Result<WagerSheet, StoreError> {
        Ok(self.data.read().await.wager_sheet(league_id, week))
    }

    async fn put_wager_sheet(&self, sheet: WagerSheet) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.put_wager_sheet(sheet);
        self.persist(&data)
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
