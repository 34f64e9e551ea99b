//! Matchup read model.
//!
//! The weekly scoreboard view the client renders: both teams with
//! their starter and bench lines resolved against the player pool for
//! one (season, week). Totals here are always raw fantasy points —
//! wager adjustment applies only in the standings fold, never on the
//! live scoreboard.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{League, Player, Team};

/// One resolved roster line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub position: String,
    pub team: String,
    pub fantasy_points: f64,
    pub projected_points: Option<f64>,
}

impl PlayerView {
    fn resolve(player: &Player, season: u16, week: u32) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            position: player.position.clone(),
            team: player.team.clone(),
            fantasy_points: player.points_for(season, week),
            projected_points: player.projection_for(season, week),
        }
    }
}

/// One side of the scoreboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub starters: Vec<PlayerView>,
    pub bench: Vec<PlayerView>,
    pub starters_total: f64,
    pub bench_total: f64,
    pub total: f64,
    pub locked: bool,
}

impl TeamView {
    fn resolve(team: &Team, players: &HashMap<String, Player>, season: u16, week: u32) -> Self {
        let starters = resolve_lines(team.starter_ids(), players, season, week);
        let bench = resolve_lines(team.bench_ids(), players, season, week);
        let starters_total: f64 = starters.iter().map(|p| p.fantasy_points).sum();
        let bench_total: f64 = bench.iter().map(|p| p.fantasy_points).sum();
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            owner: team.owner.clone(),
            starters,
            bench,
            starters_total,
            bench_total,
            total: starters_total + bench_total,
            locked: team.is_locked(week),
        }
    }
}

/// The full weekly matchup payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupView {
    pub league_id: String,
    pub league_name: String,
    pub teams: Vec<TeamView>,
}

/// Resolve a league's scoreboard for one week.
pub fn build(
    league: &League,
    players: &HashMap<String, Player>,
    season: u16,
    week: u32,
) -> MatchupView {
    MatchupView {
        league_id: league.id.clone(),
        league_name: league.name.clone(),
        teams: league
            .teams
            .iter()
            .map(|t| TeamView::resolve(t, players, season, week))
            .collect(),
    }
}

// Roster ids with no pool entry are skipped rather than rendered as
// ghosts; the client treats the lists as authoritative.
fn resolve_lines(
    ids: &[String],
    players: &HashMap<String, Player>,
    season: u16,
    week: u32,
) -> Vec<PlayerView> {
    ids.iter()
        .filter_map(|id| players.get(id))
        .map(|p| PlayerView::resolve(p, season, week))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
