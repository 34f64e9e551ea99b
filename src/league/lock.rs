//! Lineup lock state machine.
//!
//! Each (team, week) pair walks a one-way ladder: `Unlocked` until the
//! manager commits the lineup, `Locked` forever after. There is no
//! unlock transition; a locked week stays locked for the rest of the
//! season. Reveal readiness for a matchup is the conjunction of both
//! sides' lock states for the week.

use std::fmt;

use crate::types::{League, LeagueError, Team, MAX_STARTERS};

/// Where a team sits on the lock ladder for one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked)
    }

    /// Take the single legal transition. Locking a locked week is the
    /// only illegal move and reports which week was re-locked.
    pub fn advance(self, week: u32) -> Result<LockState, LeagueError> {
        match self {
            LockState::Unlocked => Ok(LockState::Locked),
            LockState::Locked => Err(LeagueError::AlreadyLocked { week }),
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Unlocked => write!(f, "unlocked"),
            LockState::Locked => write!(f, "locked"),
        }
    }
}

/// Current lock state of a team for a week, legacy flag included.
pub fn state_for(team: &Team, week: u32) -> LockState {
    if team.is_locked(week) {
        LockState::Locked
    } else {
        LockState::Unlocked
    }
}

/// Commit a lineup for the week.
///
/// The caller must own the team, the week must still be unlocked, and
/// the lineup must field exactly [`MAX_STARTERS`] starters. On success
/// a week-scoped lock entry is written; it never comes back off.
pub fn lock_team(team: &mut Team, caller: &str, week: u32) -> Result<(), LeagueError> {
    if !team.is_owned_by(caller) {
        return Err(LeagueError::Forbidden);
    }
    state_for(team, week).advance(week)?;
    let fielded = team.starter_ids().len();
    if fielded != MAX_STARTERS {
        return Err(LeagueError::InvalidLineup { starters: fielded });
    }
    team.set_week_lock(week, true);
    Ok(())
}

/// Apply the `locked` field of a team patch.
///
/// With a week this is the lock operation (or, for `false`, a no-op
/// pin rejected outright if the week is already locked). Without a
/// week it drives the legacy unscoped flag, which keeps its historical
/// free-toggle semantics for old clients. Returns whether the document
/// changed.
pub fn apply_lock_patch(
    team: &mut Team,
    caller: &str,
    week: Option<u32>,
    locked: bool,
) -> Result<bool, LeagueError> {
    match (week, locked) {
        (Some(week), true) => {
            lock_team(team, caller, week)?;
            Ok(true)
        }
        (Some(week), false) => {
            if !team.is_owned_by(caller) {
                return Err(LeagueError::Forbidden);
            }
            if state_for(team, week).is_locked() {
                // One-way ladder: a locked week never reopens.
                return Err(LeagueError::Locked { week });
            }
            // Pin an explicit unlocked entry so the legacy flag can no
            // longer shadow this week.
            team.set_week_lock(week, false);
            Ok(true)
        }
        (None, value) => {
            if !team.is_owned_by(caller) {
                return Err(LeagueError::Forbidden);
            }
            let changed = team.locked != value;
            team.locked = value;
            Ok(changed)
        }
    }
}

/// A matchup reveals for the week once both sides have locked.
pub fn reveal_ready(league: &League, week: u32) -> bool {
    match league.matchup_pair() {
        Some((home, away)) => home.is_locked(week) && away.is_locked(week),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::League;

    fn make_team(id: &str, owner: &str, starters: usize) -> Team {
        let size = starters.max(4);
        Team {
            id: id.to_string(),
            name: format!("Team {id}"),
            owner: owner.to_string(),
            roster: (0..size).map(|i| format!("{id}-p{i}")).collect(),
            starters,
            locked: false,
            locks: Vec::new(),
        }
    }

    fn make_league() -> League {
        let mut league = League::new("Lock League");
        league.teams.push(make_team("t1", "siraaj", 3));
        league.teams.push(make_team("t2", "mark", 3));
        league
    }

    #[test]
    fn test_state_machine_is_one_way() {
        let state = LockState::Unlocked;
        let locked = state.advance(2).unwrap();
        assert!(locked.is_locked());
        let err = locked.advance(2).unwrap_err();
        assert!(matches!(err, LeagueError::AlreadyLocked { week: 2 }));
    }

    #[test]
    fn test_lock_team_writes_week_entry() {
        let mut team = make_team("t1", "siraaj", 3);
        lock_team(&mut team, "siraaj", 2).unwrap();
        assert!(team.is_locked(2));
        assert!(!team.is_locked(1));
        assert_eq!(state_for(&team, 2), LockState::Locked);
    }

    #[test]
    fn test_relock_fails_idempotently() {
        let mut team = make_team("t1", "siraaj", 3);
        lock_team(&mut team, "siraaj", 2).unwrap();
        let err = lock_team(&mut team, "siraaj", 2).unwrap_err();
        assert!(matches!(err, LeagueError::AlreadyLocked { week: 2 }));
        assert!(team.is_locked(2));
    }

    #[test]
    fn test_lock_requires_full_lineup() {
        let mut team = make_team("t1", "siraaj", 2);
        let err = lock_team(&mut team, "siraaj", 1).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidLineup { starters: 2 }));
        assert!(!team.is_locked(1));
    }

    #[test]
    fn test_lock_counts_fielded_starters_not_raw_boundary() {
        // Boundary says 3 but only 2 players exist to fill it
        let mut team = make_team("t1", "siraaj", 3);
        team.roster.truncate(2);
        let err = lock_team(&mut team, "siraaj", 1).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidLineup { starters: 2 }));
    }

    #[test]
    fn test_lock_requires_ownership() {
        let mut team = make_team("t1", "siraaj", 3);
        let err = lock_team(&mut team, "mark", 1).unwrap_err();
        assert!(matches!(err, LeagueError::Forbidden));
    }

    #[test]
    fn test_patch_cannot_unlock_a_locked_week() {
        let mut team = make_team("t1", "siraaj", 3);
        lock_team(&mut team, "siraaj", 3).unwrap();
        let err = apply_lock_patch(&mut team, "siraaj", Some(3), false).unwrap_err();
        assert!(matches!(err, LeagueError::Locked { week: 3 }));
        assert!(team.is_locked(3));
    }

    #[test]
    fn test_patch_pins_explicit_unlocked_entry() {
        let mut team = make_team("t1", "siraaj", 3);
        team.locked = true; // legacy flag would lock every week
        // Week 4 has no entry yet, so the flag shadows it
        assert!(team.is_locked(4));
        // ...and the pin is refused because the week reads as locked
        let err = apply_lock_patch(&mut team, "siraaj", Some(4), false).unwrap_err();
        assert!(matches!(err, LeagueError::Locked { week: 4 }));

        // On a team without the flag, the pin writes through
        let mut fresh = make_team("t2", "mark", 3);
        let changed = apply_lock_patch(&mut fresh, "mark", Some(4), false).unwrap();
        assert!(changed);
        assert!(!fresh.is_locked(4));
        assert_eq!(fresh.locks.len(), 1);
    }

    #[test]
    fn test_patch_legacy_flag_toggles_freely() {
        let mut team = make_team("t1", "siraaj", 3);
        assert!(apply_lock_patch(&mut team, "siraaj", None, true).unwrap());
        assert!(team.locked);
        // Setting the same value again is a no-op
        assert!(!apply_lock_patch(&mut team, "siraaj", None, true).unwrap());
        assert!(apply_lock_patch(&mut team, "siraaj", None, false).unwrap());
        assert!(!team.locked);
    }

    #[test]
    fn test_patch_requires_ownership() {
        let mut team = make_team("t1", "siraaj", 3);
        assert!(matches!(
            apply_lock_patch(&mut team, "mark", Some(1), false),
            Err(LeagueError::Forbidden)
        ));
        assert!(matches!(
            apply_lock_patch(&mut team, "mark", None, true),
            Err(LeagueError::Forbidden)
        ));
    }

    #[test]
    fn test_reveal_requires_both_sides() {
        let mut league = make_league();
        assert!(!reveal_ready(&league, 1));

        lock_team(&mut league.teams[0], "siraaj", 1).unwrap();
        assert!(!reveal_ready(&league, 1));

        lock_team(&mut league.teams[1], "mark", 1).unwrap();
        assert!(reveal_ready(&league, 1));
        // Other weeks are unaffected
        assert!(!reveal_ready(&league, 2));
    }

    #[test]
    fn test_reveal_honors_legacy_flag() {
        let mut league = make_league();
        league.teams[0].locked = true;
        lock_team(&mut league.teams[1], "mark", 2).unwrap();
        assert!(reveal_ready(&league, 2));
    }

    #[test]
    fn test_reveal_false_without_matchup() {
        let mut league = League::new("Half League");
        league.teams.push(make_team("t1", "siraaj", 3));
        assert!(!reveal_ready(&league, 1));
    }
}
