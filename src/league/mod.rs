//! League orchestration.
//!
//! [`LeagueService`] ties the pure guard modules (roster, lock, wager)
//! to the store and the realtime notifier. Every mutation follows the
//! same shape: fetch a fresh copy of the league document, apply guards
//! and transforms to the copy, then replace the document under its
//! version guard. A conflicting write throws the copy away and retries
//! from fresh state, so a losing writer can never persist a partial
//! edit. Events are published only after a write has landed.

pub mod lock;
pub mod matchup;
pub mod roster;
pub mod wager;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::realtime::{LeagueEvent, RealtimeNotifier};
use crate::scoring::standings::{self, StandingsRecord};
use crate::store::{LeagueStore, StoreError};
use crate::types::{League, LeagueError, Player, Team, Wager, WagerSheet, WeeklyStat};

use self::matchup::MatchupView;

/// Attempts for a guarded league write before giving up.
const PUT_RETRIES: usize = 3;

/// League key that resolves to the first league in the store.
const DEMO_KEY: &str = "demo";

/// Partial team update, straight off the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPatch {
    pub roster: Option<Vec<String>>,
    pub starters: Option<usize>,
    pub locked: Option<bool>,
    pub week: Option<u32>,
}

/// One scored line from a stats provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatIngestRow {
    pub player_id: String,
    pub fantasy_points: Option<f64>,
    pub projected_points: Option<f64>,
}

pub struct LeagueService {
    store: Arc<dyn LeagueStore>,
    notifier: Arc<dyn RealtimeNotifier>,
    season: u16,
    max_week: u32,
}

impl LeagueService {
    pub fn new(
        store: Arc<dyn LeagueStore>,
        notifier: Arc<dyn RealtimeNotifier>,
        season: u16,
        max_week: u32,
    ) -> Self {
        info!(store = store.name(), season, max_week, "League service ready");
        Self {
            store,
            notifier,
            season,
            max_week,
        }
    }

    pub fn season(&self) -> u16 {
        self.season
    }

    pub fn max_week(&self) -> u32 {
        self.max_week
    }

    /// Resolve a league key: a league id, or [`DEMO_KEY`] for the
    /// first league in the store.
    pub async fn resolve_league(&self, key: &str) -> Result<League, LeagueError> {
        if key == DEMO_KEY {
            let mut all = self.store.leagues().await?;
            if all.is_empty() {
                return Err(LeagueError::not_found("demo league"));
            }
            return Ok(all.remove(0));
        }
        Ok(self.store.league(key).await?)
    }

    /// The weekly scoreboard for a league.
    pub async fn matchup(&self, league_key: &str, week: u32) -> Result<MatchupView, LeagueError> {
        let league = self.resolve_league(league_key).await?;
        let players = self.store.players(&roster_ids(&league)).await?;
        Ok(matchup::build(&league, &players, self.season, week))
    }

    /// Move one player across the starter/bench boundary.
    pub async fn move_player(
        &self,
        team_id: &str,
        caller: &str,
        player_id: &str,
        week: u32,
    ) -> Result<League, LeagueError> {
        let (league, _) = self
            .mutate_league(team_id, |league| {
                let team = team_mut(league, team_id)?;
                roster::move_player(team, caller, player_id, week)?;
                Ok(true)
            })
            .await?;
        self.notifier
            .publish(LeagueEvent::lineup_update(&league.id, team_id, Some(week)))
            .await;
        info!(team_id, player_id, week, "Player moved");
        Ok(league)
    }

    /// Apply a partial team update: roster order, starter boundary,
    /// and/or lock state in one write.
    pub async fn update_team(
        &self,
        team_id: &str,
        caller: &str,
        patch: TeamPatch,
    ) -> Result<League, LeagueError> {
        // A weekless patch carries no lock entry for week 0, so the
        // roster guard falls through to the legacy flag alone.
        let guard_week = patch.week.unwrap_or(0);
        let (league, wrote) = self
            .mutate_league(team_id, |league| {
                let team = team_mut(league, team_id)?;
                let mut changed = false;
                if patch.roster.is_some() || patch.starters.is_some() {
                    let proposed = patch
                        .roster
                        .clone()
                        .unwrap_or_else(|| team.roster.clone());
                    roster::replace_roster(team, caller, &proposed, patch.starters, guard_week)?;
                    changed = true;
                }
                if let Some(locked) = patch.locked {
                    changed |= lock::apply_lock_patch(team, caller, patch.week, locked)?;
                }
                Ok(changed)
            })
            .await?;
        if wrote {
            self.notifier
                .publish(LeagueEvent::lineup_update(&league.id, team_id, patch.week))
                .await;
            info!(team_id, week = ?patch.week, "Team updated");
        }
        Ok(league)
    }

    /// Commit a team's lineup for the week.
    pub async fn lock_team(
        &self,
        team_id: &str,
        caller: &str,
        week: u32,
    ) -> Result<League, LeagueError> {
        let (league, _) = self
            .mutate_league(team_id, |league| {
                let team = team_mut(league, team_id)?;
                lock::lock_team(team, caller, week)?;
                Ok(true)
            })
            .await?;
        self.notifier
            .publish(LeagueEvent::lineup_update(&league.id, team_id, Some(week)))
            .await;
        info!(team_id, week, "Lineup locked");
        Ok(league)
    }

    /// The shared wager sheet for a week.
    pub async fn wagers(&self, league_key: &str, week: u32) -> Result<WagerSheet, LeagueError> {
        let league = self.resolve_league(league_key).await?;
        Ok(self.store.wager_sheet(&league.id, week).await?)
    }

    /// Set or clear one wager on the week's sheet.
    ///
    /// Sheet writes are last-write-wins and are not broadcast; a call
    /// stays between the manager and the sheet until reveal.
    pub async fn set_wager(
        &self,
        league_key: &str,
        caller: &str,
        week: u32,
        player_id: &str,
        value: Wager,
    ) -> Result<WagerSheet, LeagueError> {
        let league = self.resolve_league(league_key).await?;
        let mut sheet = self.store.wager_sheet(&league.id, week).await?;
        wager::set_wager(&mut sheet, &league, caller, player_id, value)?;
        self.store.put_wager_sheet(sheet.clone()).await?;
        info!(league_id = %league.id, player_id, week, wager = %value, "Wager recorded");
        Ok(sheet)
    }

    /// Season standings folded through a week.
    pub async fn standings(
        &self,
        league_key: &str,
        through_week: u32,
    ) -> Result<Vec<StandingsRecord>, LeagueError> {
        let league = self.resolve_league(league_key).await?;
        let players = self.store.players(&roster_ids(&league)).await?;
        let mut sheets = HashMap::new();
        for week in 1..=through_week {
            sheets.insert(week, self.store.wager_sheet(&league.id, week).await?);
        }
        Ok(standings::compute(
            &league,
            &players,
            &sheets,
            self.season,
            through_week,
        ))
    }

    /// Ingest scored stat lines for a week and notify every league
    /// rostering an updated player.
    ///
    /// Rows merge field-wise into the existing stat line; unknown
    /// player ids are skipped.
    pub async fn ingest_stats(
        &self,
        week: u32,
        rows: Vec<StatIngestRow>,
    ) -> Result<usize, LeagueError> {
        let mut updated = 0usize;
        for row in &rows {
            let Some(mut player) = self.store.player(&row.player_id).await? else {
                warn!(player_id = %row.player_id, week, "Ignoring stat row for unknown player");
                continue;
            };
            let current = player.stat_for(self.season, week).cloned();
            player.upsert_stat(WeeklyStat {
                season: self.season,
                week,
                fantasy_points: row
                    .fantasy_points
                    .or(current.as_ref().and_then(|s| s.fantasy_points)),
                projected_points: row
                    .projected_points
                    .or(current.as_ref().and_then(|s| s.projected_points)),
            });
            self.store.put_player(player).await?;
            updated += 1;
        }

        let leagues = self.store.leagues().await?;
        for league in &leagues {
            let touched = rows
                .iter()
                .any(|r| league.team_rostering(&r.player_id).is_some());
            if touched {
                self.notifier
                    .publish(LeagueEvent::score_update(&league.id, week))
                    .await;
            }
        }
        info!(week, updated, "Stats ingested");
        Ok(updated)
    }

    /// The player pool, optionally truncated.
    pub async fn list_players(&self, limit: Option<usize>) -> Result<Vec<Player>, LeagueError> {
        let mut pool = self.store.list_players().await?;
        if let Some(limit) = limit {
            pool.truncate(limit);
        }
        Ok(pool)
    }

    /// Subscribe to a league's event channel.
    pub async fn subscribe(
        &self,
        league_key: &str,
    ) -> Result<broadcast::Receiver<LeagueEvent>, LeagueError> {
        let league = self.resolve_league(league_key).await?;
        Ok(self.notifier.subscribe(&league.id).await)
    }

    /// Guarded read-modify-write of one league document.
    ///
    /// `apply` edits a private copy and reports whether anything
    /// changed; domain errors abort immediately. A version conflict on
    /// the write discards the copy and retries against fresh state.
    /// Returns the stored league and whether a write happened.
    async fn mutate_league<F>(
        &self,
        team_id: &str,
        mut apply: F,
    ) -> Result<(League, bool), LeagueError>
    where
        F: FnMut(&mut League) -> Result<bool, LeagueError>,
    {
        for attempt in 1..=PUT_RETRIES {
            let mut league = self.store.league_by_team(team_id).await?;
            let changed = apply(&mut league)?;
            if !changed {
                return Ok((league, false));
            }
            match self.store.put_league(&league).await {
                Ok(version) => {
                    league.version = version;
                    return Ok((league, true));
                }
                Err(StoreError::VersionConflict {
                    expected, found, ..
                }) if attempt < PUT_RETRIES => {
                    warn!(
                        team_id,
                        attempt, expected, found, "League write conflicted, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(LeagueError::Storage(
            "league write retries exhausted".to_string(),
        ))
    }
}

fn team_mut<'a>(league: &'a mut League, team_id: &str) -> Result<&'a mut Team, LeagueError> {
    league
        .team_mut(team_id)
        .ok_or_else(|| LeagueError::not_found(format!("team {team_id}")))
}

fn roster_ids(league: &League) -> Vec<String> {
    league
        .teams
        .iter()
        .flat_map(|t| t.roster.iter().cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
