//! Scoring engine — wager-adjusted point math.
//!
//! Pure functions from (raw points, projection, wager, reveal gate) to
//! adjusted scores. No I/O, no rounding: totals must be reproducible
//! bit-for-bit wherever they are recomputed, so everything stays in
//! exact binary f64 arithmetic.

pub mod standings;

use crate::types::Wager;

/// Multiplier applied to a correct wager.
pub const BOOST_MULTIPLIER: f64 = 1.5;
/// Multiplier applied to an incorrect wager — the exact reciprocal of
/// the boost, not a rounded 0.75.
pub const FADE_MULTIPLIER: f64 = 1.0 / 1.5;

/// Whether a wager resolved correctly against the projection.
///
/// Tri-state: `None` when the question does not apply — no wager was
/// placed, or the feed has no projection for the week. Matching the
/// projection exactly is incorrect for both directions.
pub fn bet_correct(raw: f64, projected: Option<f64>, wager: Wager) -> Option<bool> {
    let projected = projected?;
    match wager {
        Wager::None => None,
        Wager::Over => Some(raw > projected),
        Wager::Under => Some(raw < projected),
    }
}

/// Wager-adjusted points for one player-week.
///
/// Until the matchup is reveal-ready the raw score passes through
/// untouched; adjustment only ever happens once every team in the
/// matchup has locked. Unset wagers and missing projections also pass
/// through.
pub fn adjusted(raw: f64, projected: Option<f64>, wager: Wager, reveal_ready: bool) -> f64 {
    if !reveal_ready {
        return raw;
    }
    match bet_correct(raw, projected, wager) {
        Some(true) => raw * BOOST_MULTIPLIER,
        Some(false) => raw * FADE_MULTIPLIER,
        None => raw,
    }
}

/// One starter's resolved stat line paired with its wager, ready to be
/// totalled.
#[derive(Debug, Clone, Copy)]
pub struct StarterLine {
    pub raw: f64,
    pub projected: Option<f64>,
    pub wager: Wager,
}

/// Adjusted team total over the starting lineup. Bench players never
/// contribute, so callers pass starter lines only.
pub fn adjusted_total(lines: &[StarterLine], reveal_ready: bool) -> f64 {
    lines
        .iter()
        .map(|l| adjusted(l.raw, l.projected, l.wager, reveal_ready))
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
