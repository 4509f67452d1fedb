//! Round rating
//!
//! Maps round statistics to a score in `[0, cap]` where the cap depends on
//! difficulty. Pure and deterministic.

use crate::settings::Difficulty;
use crate::sim::clamp;

/// Kills needed for a full kill score
const KILL_TARGET: f64 = 30.0;
/// Seconds after which the time score reaches zero
const TIME_WINDOW_SEC: f64 = 220.0;
/// Deaths that zero out the survival score
const DEATH_LIMIT: f64 = 3.0;

const KILL_WEIGHT: f64 = 0.32;
const ACCURACY_WEIGHT: f64 = 0.28;
const TIME_WEIGHT: f64 = 0.20;
const SURVIVAL_WEIGHT: f64 = 0.10;
const VICTORY_WEIGHT: f64 = 0.10;

/// Rating for a finished (or in-progress) round, rounded to 2 decimals
pub fn rating(
    difficulty: Difficulty,
    elapsed_sec: f64,
    kills: u32,
    shots: u32,
    deaths: u32,
    victory: bool,
) -> f64 {
    let kills = f64::from(kills);
    let kill_score = (kills / KILL_TARGET).min(1.0);
    let accuracy = (kills / f64::from(shots.max(1))).min(1.0);
    let time_score = (1.0 - (elapsed_sec.max(1.0) - 1.0) / TIME_WINDOW_SEC).max(0.0);
    let survival = (1.0 - f64::from(deaths) / DEATH_LIMIT).max(0.0);
    let victory_bonus = if victory { 1.0 } else { 0.0 };

    let weighted = KILL_WEIGHT * kill_score
        + ACCURACY_WEIGHT * accuracy
        + TIME_WEIGHT * time_score
        + SURVIVAL_WEIGHT * survival
        + VICTORY_WEIGHT * victory_bonus;

    let cap = difficulty.rating_cap();
    round_cents(clamp(weighted * cap, 0.0, cap))
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
