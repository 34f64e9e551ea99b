//! Shared types for the WILDCAT service.
//!
//! These types form the data model used across all modules: the league
//! and player documents as they are persisted and sent over the wire,
//! and the domain error taxonomy. Roster, lock, and wager rules live in
//! `crate::league`; this module only knows the shapes and the raw
//! accessors those rules are written against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Maximum number of starters a team may field in any week.
pub const MAX_STARTERS: usize = 3;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One recorded stat line for a player in a given (season, week).
///
/// `fantasy_points` is the raw scored total; `projected_points` is the
/// pre-game projection wagers resolve against. Either may be absent if
/// the feed has not reported it yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStat {
    pub season: u16,
    pub week: u32,
    pub fantasy_points: Option<f64>,
    pub projected_points: Option<f64>,
}

/// A player in the stat pool. Owned by the stat store; league documents
/// reference players by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Position tag: "QB" | "RB" | "WR" | "TE" | ...
    pub position: String,
    /// Pro team abbreviation, e.g. "KC".
    pub team: String,
    #[serde(default)]
    pub weekly_stats: Vec<WeeklyStat>,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.position, self.name, self.team)
    }
}

impl Player {
    /// The recorded stat line for a (season, week), if any.
    pub fn stat_for(&self, season: u16, week: u32) -> Option<&WeeklyStat> {
        self.weekly_stats
            .iter()
            .find(|s| s.season == season && s.week == week)
    }

    /// Raw fantasy points for a week; unrecorded weeks score 0.0.
    pub fn points_for(&self, season: u16, week: u32) -> f64 {
        self.stat_for(season, week)
            .and_then(|s| s.fantasy_points)
            .unwrap_or(0.0)
    }

    /// Projection for a week; `None` when the feed has no line.
    pub fn projection_for(&self, season: u16, week: u32) -> Option<f64> {
        self.stat_for(season, week).and_then(|s| s.projected_points)
    }

    /// Insert or replace the stat line for a (season, week).
    pub fn upsert_stat(&mut self, stat: WeeklyStat) {
        match self
            .weekly_stats
            .iter_mut()
            .find(|s| s.season == stat.season && s.week == stat.week)
        {
            Some(existing) => *existing = stat,
            None => self.weekly_stats.push(stat),
        }
    }
}

// ---------------------------------------------------------------------------
// Wager
// ---------------------------------------------------------------------------

/// A directional bet against a player's projected points for one week.
///
/// `None` is the unset default — it scores as a plain passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Wager {
    #[default]
    None,
    Over,
    Under,
}

impl Wager {
    /// Whether a direction has been chosen.
    pub fn is_set(&self) -> bool {
        !matches!(self, Wager::None)
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wager::None => write!(f, "none"),
            Wager::Over => write!(f, "over"),
            Wager::Under => write!(f, "under"),
        }
    }
}

impl std::str::FromStr for Wager {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Wager::None),
            "over" => Ok(Wager::Over),
            "under" => Ok(Wager::Under),
            _ => Err(anyhow::anyhow!("Unknown wager value: {s}")),
        }
    }
}

/// The shared wager selections for one league-week. One sheet per
/// (league, week), shared by every viewer of that matchup — not
/// per-user. Unset players are simply absent from `entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WagerSheet {
    pub league_id: String,
    pub week: u32,
    #[serde(default)]
    pub entries: HashMap<String, Wager>,
}

impl WagerSheet {
    pub fn new(league_id: impl Into<String>, week: u32) -> Self {
        Self {
            league_id: league_id.into(),
            week,
            entries: HashMap::new(),
        }
    }

    /// The wager on a player; unset reads as `Wager::None`.
    pub fn get(&self, player_id: &str) -> Wager {
        self.entries.get(player_id).copied().unwrap_or_default()
    }

    /// Record a wager. Setting `None` removes the entry so the sheet
    /// stays sparse.
    pub fn set(&mut self, player_id: &str, value: Wager) {
        if value.is_set() {
            self.entries.insert(player_id.to_string(), value);
        } else {
            self.entries.remove(player_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Team & League
// ---------------------------------------------------------------------------

/// One entry in a team's append-only per-week lock list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub week: u32,
    pub locked: bool,
}

/// A fantasy team inside a league document.
///
/// The roster is a single ordered list of player ids; the first
/// `starters` entries are the starting lineup, the rest are the bench.
/// Storing the boundary (rather than two lists) keeps the starter order
/// and the bench order in one place and survives partial lineups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Owning user id. Only the owner may mutate roster, locks, wagers.
    pub owner: String,
    pub roster: Vec<String>,
    /// Partition boundary: roster[..starters] are starters.
    #[serde(default)]
    pub starters: usize,
    /// Legacy single lock flag, kept for clients that predate per-week
    /// locks. A week without its own `locks` entry falls back to this.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub locks: Vec<LockEntry>,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} starters / {} rostered]",
            self.name,
            self.starters,
            self.roster.len(),
        )
    }
}

impl Team {
    /// Player ids currently in the starting lineup, in order.
    pub fn starter_ids(&self) -> &[String] {
        let n = self.starters.min(self.roster.len());
        &self.roster[..n]
    }

    /// Player ids currently on the bench, in order.
    pub fn bench_ids(&self) -> &[String] {
        let n = self.starters.min(self.roster.len());
        &self.roster[n..]
    }

    /// Whether a player id appears anywhere on the roster.
    pub fn has_player(&self, player_id: &str) -> bool {
        self.roster.iter().any(|id| id == player_id)
    }

    /// Whether the player is currently a starter.
    pub fn is_starter(&self, player_id: &str) -> bool {
        self.starter_ids().iter().any(|id| id == player_id)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    /// Lock status for a week: the week's own entry wins, otherwise the
    /// legacy unscoped flag.
    pub fn is_locked(&self, week: u32) -> bool {
        match self.locks.iter().find(|l| l.week == week) {
            Some(entry) => entry.locked,
            None => self.locked,
        }
    }

    /// Raw write of a week's lock entry (append or update). Transition
    /// rules are enforced by `league::lock`, not here.
    pub fn set_week_lock(&mut self, week: u32, locked: bool) {
        match self.locks.iter_mut().find(|l| l.week == week) {
            Some(entry) => entry.locked = locked,
            None => self.locks.push(LockEntry { week, locked }),
        }
    }
}

/// A league document: the teams plus a version counter used for guarded
/// read-modify-write persistence. One matchup per week: the first two
/// teams, pairing externally fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    pub teams: Vec<Team>,
    /// Document version; bumped by the store on every accepted write.
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} teams, v{}]", self.name, self.teams.len(), self.version)
    }
}

impl League {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            teams: Vec::new(),
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn team_mut(&mut self, team_id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team_id)
    }

    /// The team currently rostering a player, if any.
    pub fn team_rostering(&self, player_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_player(player_id))
    }

    /// The week's matchup pair: the first two teams of the league.
    /// Returns `None` for leagues that cannot field a matchup yet.
    pub fn matchup_pair(&self) -> Option<(&Team, &Team)> {
        match self.teams.as_slice() {
            [a, b, ..] => Some((a, b)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for WILDCAT.
///
/// Validation variants are raised before any state is mutated or any
/// event emitted; `Storage` is raised after the persistence collaborator
/// fails and the optimistic local change has been rolled back.
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("Forbidden: caller does not own this team")]
    Forbidden,

    #[error("Team is locked for week {week}")]
    Locked { week: u32 },

    #[error("Team is already locked for week {week}")]
    AlreadyLocked { week: u32 },

    #[error("Cannot lock with {starters} starters (need exactly 3)")]
    InvalidLineup { starters: usize },

    #[error("Starting lineup is full (3 starters)")]
    CapacityExceeded,

    #[error("Wagers are closed: week {week} is reveal-ready")]
    RevealLocked { week: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl LeagueError {
    pub fn not_found(what: impl Into<String>) -> Self {
        LeagueError::NotFound(what.into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_player(id: &str, points: &[(f64, f64)]) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            position: "RB".to_string(),
            team: "KC".to_string(),
            weekly_stats: points
                .iter()
                .enumerate()
                .map(|(i, (raw, proj))| WeeklyStat {
                    season: 2025,
                    week: (i + 1) as u32,
                    fantasy_points: Some(*raw),
                    projected_points: Some(*proj),
                })
                .collect(),
        }
    }

    fn make_team(id: &str, owner: &str, roster: &[&str], starters: usize) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {id}"),
            owner: owner.to_string(),
            roster: roster.iter().map(|s| s.to_string()).collect(),
            starters,
            locked: false,
            locks: Vec::new(),
        }
    }

    // -- Wager tests --

    #[test]
    fn test_wager_default_is_none() {
        assert_eq!(Wager::default(), Wager::None);
        assert!(!Wager::default().is_set());
        assert!(Wager::Over.is_set());
    }

    #[test]
    fn test_wager_display() {
        assert_eq!(format!("{}", Wager::None), "none");
        assert_eq!(format!("{}", Wager::Over), "over");
        assert_eq!(format!("{}", Wager::Under), "under");
    }

    #[test]
    fn test_wager_from_str() {
        assert_eq!("over".parse::<Wager>().unwrap(), Wager::Over);
        assert_eq!("UNDER".parse::<Wager>().unwrap(), Wager::Under);
        assert_eq!("none".parse::<Wager>().unwrap(), Wager::None);
        assert!("more".parse::<Wager>().is_err());
    }

    #[test]
    fn test_wager_serialization_lowercase() {
        assert_eq!(serde_json::to_string(&Wager::Over).unwrap(), "\"over\"");
        assert_eq!(serde_json::to_string(&Wager::Under).unwrap(), "\"under\"");
        let parsed: Wager = serde_json::from_str("\"under\"").unwrap();
        assert_eq!(parsed, Wager::Under);
    }

    // -- WagerSheet tests --

    #[test]
    fn test_wager_sheet_defaults_to_none() {
        let sheet = WagerSheet::new("lg1", 3);
        assert_eq!(sheet.get("p1"), Wager::None);
    }

    #[test]
    fn test_wager_sheet_set_and_get() {
        let mut sheet = WagerSheet::new("lg1", 3);
        sheet.set("p1", Wager::Over);
        assert_eq!(sheet.get("p1"), Wager::Over);
        assert_eq!(sheet.get("p2"), Wager::None);
    }

    #[test]
    fn test_wager_sheet_set_none_removes_entry() {
        let mut sheet = WagerSheet::new("lg1", 3);
        sheet.set("p1", Wager::Under);
        assert_eq!(sheet.entries.len(), 1);
        sheet.set("p1", Wager::None);
        assert!(sheet.entries.is_empty());
    }

    #[test]
    fn test_wager_sheet_serialization_roundtrip() {
        let mut sheet = WagerSheet::new("lg1", 2);
        sheet.set("p1", Wager::Over);
        let json = serde_json::to_string(&sheet).unwrap();
        assert!(json.contains("\"leagueId\":\"lg1\""));
        let parsed: WagerSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.week, 2);
        assert_eq!(parsed.get("p1"), Wager::Over);
    }

    // -- Player tests --

    #[test]
    fn test_player_stat_resolution() {
        let p = make_player("p1", &[(10.0, 12.0), (20.0, 15.0)]);
        assert!((p.points_for(2025, 2) - 20.0).abs() < 1e-10);
        assert_eq!(p.projection_for(2025, 1), Some(12.0));
    }

    #[test]
    fn test_player_unrecorded_week_scores_zero() {
        let p = make_player("p1", &[(10.0, 12.0)]);
        assert_eq!(p.points_for(2025, 9), 0.0);
        assert_eq!(p.projection_for(2025, 9), None);
        // Same week, different season
        assert_eq!(p.points_for(2024, 1), 0.0);
    }

    #[test]
    fn test_player_upsert_stat_replaces() {
        let mut p = make_player("p1", &[(10.0, 12.0)]);
        p.upsert_stat(WeeklyStat {
            season: 2025,
            week: 1,
            fantasy_points: Some(18.5),
            projected_points: Some(12.0),
        });
        assert_eq!(p.weekly_stats.len(), 1);
        assert!((p.points_for(2025, 1) - 18.5).abs() < 1e-10);
    }

    #[test]
    fn test_player_upsert_stat_appends_new_week() {
        let mut p = make_player("p1", &[(10.0, 12.0)]);
        p.upsert_stat(WeeklyStat {
            season: 2025,
            week: 2,
            fantasy_points: Some(7.0),
            projected_points: None,
        });
        assert_eq!(p.weekly_stats.len(), 2);
        assert!((p.points_for(2025, 2) - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_player_serialization_camel_case() {
        let p = make_player("p1", &[(10.0, 12.0)]);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"weeklyStats\""));
        assert!(json.contains("\"fantasyPoints\":10.0"));
        assert!(json.contains("\"projectedPoints\":12.0"));
    }

    #[test]
    fn test_player_display() {
        let p = make_player("p1", &[]);
        assert_eq!(format!("{p}"), "[RB] Player p1 (KC)");
    }

    // -- Team tests --

    #[test]
    fn test_team_partition() {
        let team = make_team("t1", "u1", &["a", "b", "c", "d", "e"], 3);
        assert_eq!(team.starter_ids(), &["a", "b", "c"]);
        assert_eq!(team.bench_ids(), &["d", "e"]);
        assert!(team.is_starter("b"));
        assert!(!team.is_starter("d"));
        assert!(team.has_player("e"));
        assert!(!team.has_player("z"));
    }

    #[test]
    fn test_team_partition_partial_lineup() {
        let team = make_team("t1", "u1", &["a", "b", "c"], 1);
        assert_eq!(team.starter_ids(), &["a"]);
        assert_eq!(team.bench_ids(), &["b", "c"]);
    }

    #[test]
    fn test_team_partition_boundary_clamped_to_roster() {
        let mut team = make_team("t1", "u1", &["a"], 1);
        team.starters = 5; // corrupt boundary must not panic
        assert_eq!(team.starter_ids(), &["a"]);
        assert!(team.bench_ids().is_empty());
    }

    #[test]
    fn test_team_lock_lookup_prefers_week_entry() {
        let mut team = make_team("t1", "u1", &["a"], 1);
        team.locked = true; // legacy flag
        team.set_week_lock(3, false);
        assert!(!team.is_locked(3)); // week entry wins
        assert!(team.is_locked(4)); // falls back to legacy flag
    }

    #[test]
    fn test_team_set_week_lock_appends_then_updates() {
        let mut team = make_team("t1", "u1", &["a"], 1);
        team.set_week_lock(2, true);
        assert_eq!(team.locks.len(), 1);
        assert!(team.is_locked(2));
        team.set_week_lock(2, true);
        assert_eq!(team.locks.len(), 1); // no duplicate entry
    }

    #[test]
    fn test_team_ownership() {
        let team = make_team("t1", "siraaj", &[], 0);
        assert!(team.is_owned_by("siraaj"));
        assert!(!team.is_owned_by("mark"));
    }

    #[test]
    fn test_team_serialization_roundtrip() {
        let mut team = make_team("t1", "u1", &["a", "b"], 1);
        team.set_week_lock(1, true);
        let json = serde_json::to_string(&team).unwrap();
        let parsed: Team = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.starter_ids(), &["a"]);
        assert!(parsed.is_locked(1));
    }

    #[test]
    fn test_team_deserializes_without_lock_fields() {
        // Documents written before per-week locks existed.
        let json = r#"{"id":"t1","name":"Old","owner":"u1","roster":["a"]}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert!(!team.locked);
        assert!(team.locks.is_empty());
        assert_eq!(team.starters, 0);
    }

    // -- League tests --

    #[test]
    fn test_league_new_has_id() {
        let league = League::new("Test League");
        assert!(!league.id.is_empty());
        assert_eq!(league.version, 0);
        assert!(league.teams.is_empty());
    }

    #[test]
    fn test_league_team_lookup() {
        let mut league = League::new("L");
        league.teams.push(make_team("t1", "u1", &["a"], 1));
        league.teams.push(make_team("t2", "u2", &["b"], 1));
        assert!(league.team("t2").is_some());
        assert!(league.team("t3").is_none());
        assert_eq!(league.team_rostering("b").unwrap().id, "t2");
        assert!(league.team_rostering("z").is_none());
    }

    #[test]
    fn test_league_matchup_pair() {
        let mut league = League::new("L");
        assert!(league.matchup_pair().is_none());
        league.teams.push(make_team("t1", "u1", &[], 0));
        assert!(league.matchup_pair().is_none());
        league.teams.push(make_team("t2", "u2", &[], 0));
        let (a, b) = league.matchup_pair().unwrap();
        assert_eq!(a.id, "t1");
        assert_eq!(b.id, "t2");
    }

    #[test]
    fn test_league_serialization_camel_case() {
        let league = League::new("L");
        let json = serde_json::to_string(&league).unwrap();
        assert!(json.contains("\"createdAt\""));
    }

    // -- LeagueError tests --

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", LeagueError::InvalidLineup { starters: 2 }),
            "Cannot lock with 2 starters (need exactly 3)"
        );
        assert_eq!(
            format!("{}", LeagueError::AlreadyLocked { week: 4 }),
            "Team is already locked for week 4"
        );
        assert!(format!("{}", LeagueError::not_found("team t9")).contains("team t9"));
    }
}
