//! Wager placement guards.
//!
//! Wagers live on the shared per-week sheet; placement is the only
//! guarded path. A manager may set or clear a call on any player their
//! own team rosters, up until the matchup reveals for that week. After
//! reveal the sheet is frozen — the multiplier is already in play.

use crate::league::lock::reveal_ready;
use crate::types::{League, LeagueError, Wager, WagerSheet};

/// Set (or clear, with [`Wager::None`]) the call on one player for the
/// sheet's week.
pub fn set_wager(
    sheet: &mut WagerSheet,
    league: &League,
    caller: &str,
    player_id: &str,
    value: Wager,
) -> Result<(), LeagueError> {
    let team = league
        .team_rostering(player_id)
        .ok_or_else(|| LeagueError::not_found(format!("player {player_id} on any roster")))?;
    if !team.is_owned_by(caller) {
        return Err(LeagueError::Forbidden);
    }
    if reveal_ready(league, sheet.week) {
        return Err(LeagueError::RevealLocked { week: sheet.week });
    }
    sheet.set(player_id, value);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
