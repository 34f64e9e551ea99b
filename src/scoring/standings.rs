//! Standings aggregator — folds a season of matchups into records.
//!
//! Read-only: walks every reveal-ready week through the configured
//! horizon, totals each side's starters with wager adjustment applied,
//! and accumulates win/loss/tie records and point totals. Weeks whose
//! matchup is not reveal-ready contribute nothing.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{adjusted_total, StarterLine};
use crate::league::lock::reveal_ready;
use crate::types::{League, Player, Team, WagerSheet};

/// Two weekly totals closer than this count as a tie. Guards against
/// floating-point false negatives when both sides carry adjusted
/// fractions; applies to the win/loss/tie decision only, never to the
/// final ordering.
pub const TIE_TOLERANCE: f64 = 1e-4;

/// Season record for one team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRecord {
    pub team_id: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

impl StandingsRecord {
    fn new(team: &Team) -> Self {
        Self {
            team_id: team.id.clone(),
            name: team.name.clone(),
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0.0,
            points_against: 0.0,
        }
    }
}

/// Adjusted starter total for one team-week. Bench players never
/// count, and players missing from the pool score nothing. Callers
/// gate on reveal-readiness; this always applies wager adjustment.
pub fn team_total(
    team: &Team,
    players: &HashMap<String, Player>,
    sheet: &WagerSheet,
    season: u16,
    week: u32,
) -> f64 {
    let lines: Vec<StarterLine> = team
        .starter_ids()
        .iter()
        .filter_map(|id| players.get(id))
        .map(|p| StarterLine {
            raw: p.points_for(season, week),
            projected: p.projection_for(season, week),
            wager: sheet.get(&p.id),
        })
        .collect();
    adjusted_total(&lines, true)
}

/// Fold weeks 1..=`through_week` of the league's matchup into standings.
///
/// Output is ordered: wins descending, then points-for descending
/// (compared exactly — the tie tolerance only applies to per-week
/// outcomes), with full ties left in encounter order.
pub fn compute(
    league: &League,
    players: &HashMap<String, Player>,
    sheets: &HashMap<u32, WagerSheet>,
    season: u16,
    through_week: u32,
) -> Vec<StandingsRecord> {
    let Some((team_a, team_b)) = league.matchup_pair() else {
        return Vec::new();
    };

    let mut rec_a = StandingsRecord::new(team_a);
    let mut rec_b = StandingsRecord::new(team_b);

    for week in 1..=through_week {
        if !reveal_ready(league, week) {
            continue;
        }

        let empty;
        let sheet = match sheets.get(&week) {
            Some(s) => s,
            None => {
                empty = WagerSheet::new(&league.id, week);
                &empty
            }
        };

        let total_a = team_total(team_a, players, sheet, season, week);
        let total_b = team_total(team_b, players, sheet, season, week);

        rec_a.points_for += total_a;
        rec_a.points_against += total_b;
        rec_b.points_for += total_b;
        rec_b.points_against += total_a;

        if (total_a - total_b).abs() < TIE_TOLERANCE {
            rec_a.ties += 1;
            rec_b.ties += 1;
        } else if total_a > total_b {
            rec_a.wins += 1;
            rec_b.losses += 1;
        } else {
            rec_b.wins += 1;
            rec_a.losses += 1;
        }
    }

    let mut records = vec![rec_a, rec_b];
    sort_records(&mut records);
    records
}

/// Order standings in place: wins desc, points-for desc, encounter
/// order preserved on full ties (stable sort).
pub fn sort_records(records: &mut [StandingsRecord]) {
    records.sort_by(|x, y| {
        y.wins.cmp(&x.wins).then_with(|| {
            y.points_for
                .partial_cmp(&x.points_for)
                .unwrap_or(Ordering::Equal)
        })
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Wager, WeeklyStat};
    use chrono::Utc;

    fn make_player(id: &str, lines: &[(u32, f64, Option<f64>)]) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            position: "RB".to_string(),
            team: "KC".to_string(),
            weekly_stats: lines
                .iter()
                .map(|(week, raw, proj)| WeeklyStat {
                    season: 2025,
                    week: *week,
                    fantasy_points: Some(*raw),
                    projected_points: *proj,
                })
                .collect(),
        }
    }

    fn make_team(id: &str, owner: &str, roster: &[&str]) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {id}"),
            owner: owner.to_string(),
            roster: roster.iter().map(|s| s.to_string()).collect(),
            starters: 3,
            locked: false,
            locks: Vec::new(),
        }
    }

    /// Two 3-starter teams; both locked for week 1 unless stated.
    fn make_league() -> (League, HashMap<String, Player>) {
        let players = [
            // Team A starters: 18 over 15, 10 under 12, 8 flat at 8
            make_player("a1", &[(1, 18.0, Some(15.0))]),
            make_player("a2", &[(1, 10.0, Some(12.0))]),
            make_player("a3", &[(1, 8.0, Some(8.0))]),
            // Team B starters: raw 40 total, no projections
            make_player("b1", &[(1, 20.0, None)]),
            make_player("b2", &[(1, 10.0, None)]),
            make_player("b3", &[(1, 10.0, None)]),
        ];
        let pool: HashMap<String, Player> =
            players.into_iter().map(|p| (p.id.clone(), p)).collect();

        let mut league = League {
            id: "lg1".to_string(),
            name: "Test League".to_string(),
            teams: vec![
                make_team("ta", "siraaj", &["a1", "a2", "a3"]),
                make_team("tb", "mark", &["b1", "b2", "b3"]),
            ],
            version: 1,
            created_at: Utc::now(),
        };
        for team in &mut league.teams {
            team.set_week_lock(1, true);
        }
        (league, pool)
    }

    fn week1_sheet() -> HashMap<u32, WagerSheet> {
        let mut sheet = WagerSheet::new("lg1", 1);
        sheet.set("a1", Wager::Over);
        sheet.set("a2", Wager::Under);
        HashMap::from([(1, sheet)])
    }

    fn make_record(id: &str, wins: u32, points_for: f64) -> StandingsRecord {
        StandingsRecord {
            team_id: id.to_string(),
            name: id.to_string(),
            wins,
            losses: 0,
            ties: 0,
            points_for,
            points_against: 0.0,
        }
    }

    #[test]
    fn test_adjusted_win_scenario() {
        // A: 18*1.5 + 10*1.5 + 8 = 50.0 beats B's raw 40.0
        let (league, pool) = make_league();
        let records = compute(&league, &pool, &week1_sheet(), 2025, 1);

        assert_eq!(records[0].team_id, "ta");
        assert_eq!(records[0].wins, 1);
        assert!((records[0].points_for - 50.0).abs() < 1e-10);
        assert!((records[0].points_against - 40.0).abs() < 1e-10);
        assert_eq!(records[1].team_id, "tb");
        assert_eq!(records[1].losses, 1);
        assert!((records[1].points_for - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_unrevealed_week_contributes_nothing() {
        let (mut league, pool) = make_league();
        // B never locks week 1
        league.teams[1].locks.clear();
        let records = compute(&league, &pool, &week1_sheet(), 2025, 1);

        for rec in &records {
            assert_eq!(rec.wins + rec.losses + rec.ties, 0);
            assert_eq!(rec.points_for, 0.0);
        }
    }

    #[test]
    fn test_legacy_lock_flag_counts_for_reveal() {
        let (mut league, pool) = make_league();
        league.teams[1].locks.clear();
        league.teams[1].locked = true;
        let records = compute(&league, &pool, &week1_sheet(), 2025, 1);
        assert_eq!(records[0].wins, 1);
    }

    #[test]
    fn test_missing_sheet_scores_raw() {
        let (league, pool) = make_league();
        let records = compute(&league, &pool, &HashMap::new(), 2025, 1);
        // No wagers anywhere: A totals raw 36, B raw 40 — B wins
        assert_eq!(records[0].team_id, "tb");
        assert!((records[0].points_for - 40.0).abs() < 1e-10);
        assert!((records[1].points_for - 36.0).abs() < 1e-10);
    }

    #[test]
    fn test_bench_never_counts() {
        let (mut league, mut pool) = make_league();
        // A huge week from a benched player must not move the total.
        pool.insert("a9".to_string(), make_player("a9", &[(1, 99.0, None)]));
        league.teams[0].roster.push("a9".to_string());
        let records = compute(&league, &pool, &week1_sheet(), 2025, 1);
        let rec_a = records.iter().find(|r| r.team_id == "ta").unwrap();
        assert!((rec_a.points_for - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_near_equal_totals_tie() {
        let (league, mut pool) = make_league();
        // Rebuild B to total 36.00005 raw vs A's unwagered 36.0
        pool.get_mut("b1").unwrap().weekly_stats[0].fantasy_points = Some(16.00005);
        pool.get_mut("b2").unwrap().weekly_stats[0].fantasy_points = Some(10.0);
        pool.get_mut("b3").unwrap().weekly_stats[0].fantasy_points = Some(10.0);
        let records = compute(&league, &pool, &HashMap::new(), 2025, 1);
        assert_eq!(records[0].ties, 1);
        assert_eq!(records[1].ties, 1);
        assert_eq!(records[0].wins + records[1].wins, 0);
    }

    #[test]
    fn test_multi_week_fold() {
        let (mut league, mut pool) = make_league();
        // Week 2 stats: B outscores A; both teams locked for week 2 only
        for id in ["a1", "a2", "a3"] {
            pool.get_mut(id).unwrap().upsert_stat(WeeklyStat {
                season: 2025,
                week: 2,
                fantasy_points: Some(5.0),
                projected_points: None,
            });
        }
        for id in ["b1", "b2", "b3"] {
            pool.get_mut(id).unwrap().upsert_stat(WeeklyStat {
                season: 2025,
                week: 2,
                fantasy_points: Some(12.0),
                projected_points: None,
            });
        }
        for team in &mut league.teams {
            team.set_week_lock(2, true);
        }
        let records = compute(&league, &pool, &week1_sheet(), 2025, 5);

        let rec_a = records.iter().find(|r| r.team_id == "ta").unwrap();
        let rec_b = records.iter().find(|r| r.team_id == "tb").unwrap();
        assert_eq!((rec_a.wins, rec_a.losses), (1, 1));
        assert_eq!((rec_b.wins, rec_b.losses), (1, 1));
        assert!((rec_a.points_for - 65.0).abs() < 1e-10); // 50 + 15
        assert!((rec_b.points_for - 76.0).abs() < 1e-10); // 40 + 36
    }

    #[test]
    fn test_sort_points_for_compared_exactly() {
        // 150.00005 vs 150.0 differ by less than the tie tolerance, but
        // ordering must still put the higher total first.
        let mut records = vec![
            make_record("x", 2, 150.0),
            make_record("y", 2, 150.00005),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].team_id, "y");
    }

    #[test]
    fn test_sort_wins_before_points() {
        let mut records = vec![
            make_record("x", 1, 500.0),
            make_record("y", 3, 100.0),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].team_id, "y");
    }

    #[test]
    fn test_sort_full_tie_keeps_encounter_order() {
        let mut records = vec![
            make_record("first", 2, 100.0),
            make_record("second", 2, 100.0),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].team_id, "first");
        assert_eq!(records[1].team_id, "second");
    }

    #[test]
    fn test_record_serialization_camel_case() {
        let rec = make_record("x", 1, 12.5);
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"teamId\""));
        assert!(json.contains("\"pointsFor\""));
        assert!(json.contains("\"pointsAgainst\""));
    }

    #[test]
    fn test_short_league_has_no_standings() {
        let league = League::new("empty");
        let records = compute(&league, &HashMap::new(), &HashMap::new(), 2025, 5);
        assert!(records.is_empty());
    }
}
