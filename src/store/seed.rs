//! Demo dataset.
//!
//! A single two-team league plus a twenty-man player pool with five
//! weeks of scored stats, enough to exercise every surface: lineup
//! moves, locks, wagers, and a standings race. Seeding is idempotent —
//! an already-populated store is left alone.

use tracing::info;

use crate::store::{LeagueStore, StoreError};
use crate::types::{League, Player, Team, WeeklyStat};

/// Season all demo stats are filed under.
pub const SEED_SEASON: u16 = 2025;

fn player(id: &str, name: &str, position: &str, team: &str, lines: [(f64, f64); 5]) -> Player {
    Player {
        id: id.to_string(),
        name: name.to_string(),
        position: position.to_string(),
        team: team.to_string(),
        weekly_stats: lines
            .iter()
            .enumerate()
            .map(|(i, (points, projected))| WeeklyStat {
                season: SEED_SEASON,
                week: i as u32 + 1,
                fantasy_points: Some(*points),
                projected_points: Some(*projected),
            })
            .collect(),
    }
}

/// The demo player pool, in draft order.
pub fn demo_players() -> Vec<Player> {
    vec![
        player(
            "patrick-mahomes",
            "Patrick Mahomes",
            "QB",
            "KC",
            [
                (26.02, 19.08),
                (23.08, 19.46),
                (13.16, 20.79),
                (27.30, 18.42),
                (27.72, 20.50),
            ],
        ),
        player(
            "christian-mccaffrey",
            "Christian McCaffrey",
            "RB",
            "SF",
            [
                (23.20, 19.72),
                (22.70, 20.68),
                (24.00, 24.29),
                (26.10, 23.38),
                (27.90, 24.90),
            ],
        ),
        player(
            "justin-jefferson",
            "Justin Jefferson",
            "WR",
            "MIN",
            [
                (14.80, 18.82),
                (11.10, 18.43),
                (12.50, 18.02),
                (22.60, 14.66),
                (19.30, 14.92),
            ],
        ),
        player(
            "travis-kelce",
            "Travis Kelce",
            "TE",
            "KC",
            [
                (12.70, 11.5),
                (10.10, 12.0),
                (6.60, 10.8),
                (9.80, 9.9),
                (19.10, 14.5),
            ],
        ),
        player(
            "derrick-henry",
            "Derrick Henry",
            "RB",
            "BAL",
            [
                (29.20, 22.5),
                (2.30, 12.0),
                (10.70, 14.0),
                (9.30, 11.2),
                (14.00, 13.8),
            ],
        ),
        player(
            "tyreek-hill",
            "Tyreek Hill",
            "WR",
            "MIA",
            [
                (8.00, 12.2),
                (16.90, 15.8),
                (15.90, 14.7),
                (12.70, 13.0),
                (0.0, 10.0),
            ],
        ),
        player(
            "jonathan-taylor",
            "Jonathan Taylor",
            "RB",
            "IND",
            [
                (12.80, 11.2),
                (29.50, 20.0),
                (32.80, 22.5),
                (14.60, 15.0),
                (31.60, 19.8),
            ],
        ),
        player(
            "aj-brown",
            "A.J. Brown",
            "WR",
            "PHI",
            [
                (1.80, 11.0),
                (7.70, 12.2),
                (22.90, 18.5),
                (2.70, 13.0),
                (9.30, 12.4),
            ],
        ),
        player(
            "lamar-jackson",
            "Lamar Jackson",
            "QB",
            "BAL",
            [
                (29.36, 24.0),
                (26.30, 21.5),
                (27.02, 20.9),
                (11.68, 18.0),
                (0.0, 15.0),
            ],
        ),
        player(
            "nick-chubb",
            "Nick Chubb",
            "RB",
            "HOU",
            [
                (6.00, 10.2),
                (15.20, 13.8),
                (7.00, 12.0),
                (8.20, 11.4),
                (12.10, 14.0),
            ],
        ),
        player(
            "cooper-kupp",
            "Cooper Kupp",
            "WR",
            "SEA",
            [
                (3.50, 12.0),
                (16.00, 15.5),
                (5.10, 13.0),
                (6.60, 11.2),
                (11.90, 12.8),
            ],
        ),
        player(
            "trey-mcbride",
            "Trey McBride",
            "TE",
            "AZ",
            [
                (12.10, 10.5),
                (13.80, 12.8),
                (15.30, 13.9),
                (12.20, 11.6),
                (9.10, 9.8),
            ],
        ),
        player(
            "josh-allen",
            "Josh Allen",
            "QB",
            "BUF",
            [
                (38.76, 28.5),
                (11.82, 20.0),
                (23.02, 22.5),
                (25.86, 24.0),
                (20.42, 21.0),
            ],
        ),
        player(
            "davante-adams",
            "Davante Adams",
            "WR",
            "LAR",
            [
                (9.10, 13.0),
                (22.60, 16.5),
                (14.60, 15.2),
                (15.60, 14.8),
                (13.80, 14.0),
            ],
        ),
        player(
            "stefon-diggs",
            "Stefon Diggs",
            "WR",
            "NE",
            [
                (11.70, 12.2),
                (7.20, 11.6),
                (5.30, 10.8),
                (16.10, 13.5),
                (24.60, 18.9),
            ],
        ),
        player(
            "brock-bowers",
            "Brock Bowers",
            "TE",
            "LV",
            [
                (15.30, 12.0),
                (8.80, 10.0),
                (9.80, 9.5),
                (9.60, 10.2),
                (0.0, 9.0),
            ],
        ),
        player(
            "jamarr-chase",
            "Ja'Marr Chase",
            "WR",
            "CIN",
            [
                (4.60, 13.8),
                (36.50, 18.5),
                (8.90, 14.0),
                (7.30, 12.2),
                (29.00, 17.9),
            ],
        ),
        player(
            "jaxon-smith-njigba",
            "Jaxon Smith-Njigba",
            "WR",
            "SEA",
            [
                (19.40, 16.0),
                (18.30, 15.8),
                (20.60, 15.2),
                (13.00, 13.5),
                (27.20, 18.9),
            ],
        ),
        player(
            "josh-jacobs",
            "Josh Jacobs",
            "RB",
            "GB",
            [
                (14.00, 13.5),
                (14.40, 14.0),
                (12.40, 13.0),
                (31.70, 17.5),
                (32.00, 19.2),
            ],
        ),
        player(
            "mark-andrews",
            "Mark Andrews",
            "TE",
            "BAL",
            [
                (12.8, 11.0),
                (11.6, 11.2),
                (14.2, 12.8),
                (12.3, 11.5),
                (13.4, 12.6),
            ],
        ),
    ]
}

/// The demo league: two six-man rosters, three starters each.
pub fn demo_league() -> League {
    let mut league = League::new("Wildcat League");
    league.teams.push(Team {
        id: "team-siraaj".to_string(),
        name: "Siraaj's Stars".to_string(),
        owner: "siraaj".to_string(),
        roster: vec![
            "patrick-mahomes".to_string(),
            "christian-mccaffrey".to_string(),
            "justin-jefferson".to_string(),
            "travis-kelce".to_string(),
            "derrick-henry".to_string(),
            "tyreek-hill".to_string(),
        ],
        starters: 3,
        locked: false,
        locks: Vec::new(),
    });
    league.teams.push(Team {
        id: "team-mark".to_string(),
        name: "Mark Em Down".to_string(),
        owner: "mark".to_string(),
        roster: vec![
            "jonathan-taylor".to_string(),
            "aj-brown".to_string(),
            "lamar-jackson".to_string(),
            "nick-chubb".to_string(),
            "cooper-kupp".to_string(),
            "trey-mcbride".to_string(),
        ],
        starters: 3,
        locked: false,
        locks: Vec::new(),
    });
    league
}

/// Populate an empty store with the demo dataset. A store that already
/// holds any league is left untouched.
pub async fn seed_if_empty(store: &dyn LeagueStore) -> Result<bool, StoreError> {
    if !store.leagues().await?.is_empty() {
        return Ok(false);
    }

    let league = demo_league();
    let players = demo_players();
    info!(
        league = %league.name,
        teams = league.teams.len(),
        players = players.len(),
        "Seeding demo dataset"
    );

    for p in players {
        store.put_player(p).await?;
    }
    store.insert_league(league).await?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
