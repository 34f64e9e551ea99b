//! Roster manager — starter/bench partition rules.
//!
//! Pure transforms over a team document: callers (the league service)
//! apply these to a working copy inside a guarded read-modify-write,
//! so a rejected move leaves no partial state anywhere. The roster is
//! always starters-then-bench; these are the only functions that move
//! the boundary.

use crate::types::{LeagueError, Team, MAX_STARTERS};

/// Move one player across the starter/bench boundary.
///
/// Starters always drop to the bench; bench players are promoted only
/// while the lineup has room. The mover must own the team and the team
/// must be unlocked for the week being edited.
pub fn move_player(
    team: &mut Team,
    caller: &str,
    player_id: &str,
    week: u32,
) -> Result<(), LeagueError> {
    if !team.is_owned_by(caller) {
        return Err(LeagueError::Forbidden);
    }
    if team.is_locked(week) {
        return Err(LeagueError::Locked { week });
    }
    let idx = team
        .roster
        .iter()
        .position(|id| id == player_id)
        .ok_or_else(|| LeagueError::not_found(format!("player {player_id} on team {}", team.id)))?;

    let boundary = team.starters.min(team.roster.len());
    if idx < boundary {
        // Starter to bench: demoted players join the end of the bench.
        let id = team.roster.remove(idx);
        team.roster.push(id);
        team.starters = boundary - 1;
    } else {
        // Bench to starter: promoted players take the last lineup slot.
        if boundary >= MAX_STARTERS {
            return Err(LeagueError::CapacityExceeded);
        }
        let id = team.roster.remove(idx);
        team.roster.insert(boundary, id);
        team.starters = boundary + 1;
    }
    Ok(())
}

/// Replace the whole roster order in one write.
///
/// The new list must be a permutation of the current roster — this is
/// a reordering surface, not an add/drop surface. An explicit
/// `starters` moves the partition boundary; otherwise the current
/// boundary is kept.
pub fn replace_roster(
    team: &mut Team,
    caller: &str,
    roster: &[String],
    starters: Option<usize>,
    week: u32,
) -> Result<(), LeagueError> {
    if !team.is_owned_by(caller) {
        return Err(LeagueError::Forbidden);
    }
    if team.is_locked(week) {
        return Err(LeagueError::Locked { week });
    }
    if !is_permutation(&team.roster, roster) {
        return Err(LeagueError::not_found(
            "roster update must keep exactly the current players",
        ));
    }

    let boundary = starters.unwrap_or(team.starters);
    if boundary > MAX_STARTERS {
        return Err(LeagueError::CapacityExceeded);
    }

    team.roster = roster.to_vec();
    team.starters = boundary.min(team.roster.len());
    Ok(())
}

fn is_permutation(current: &[String], proposed: &[String]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut a: Vec<&String> = current.iter().collect();
    let mut b: Vec<&String> = proposed.iter().collect();
    a.sort();
    b.sort();
    a == b
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
