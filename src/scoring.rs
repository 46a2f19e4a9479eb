//! Level scoring and the fail rule.
//!
//! ```text
//!  max_score  = base_max_score + (level - 1) * cap_increase_per_level
//!  time_score = round(max_score * exp(-elapsed / (base_target_time * time_factor)))
//!  score      = time_score + accel_bonus_points? + hr_bonus_points?
//! ```
//!
//! Pure functions over [`ScoringConfig`]; nothing here touches the clock.

use crate::config::ScoringConfig;
use crate::fsm::context::PlayerStats;

/// Ceiling of the time score at `level`.
pub fn max_score(cfg: &ScoringConfig, level: u32) -> u32 {
    let above_first = level.max(1) - 1;
    cfg.base_max_score
        .saturating_add(above_first.saturating_mul(cfg.cap_increase_per_level))
}

/// Time-decayed score for a passed level plus any bonuses.
///
/// Negative or non-finite elapsed times are treated as zero.
pub fn score_passed_level(
    cfg: &ScoringConfig,
    level: u32,
    elapsed_secs: f64,
    accel_bonus: bool,
    hr_bonus: bool,
) -> u32 {
    let elapsed = if elapsed_secs.is_finite() {
        elapsed_secs.max(0.0)
    } else {
        0.0
    };
    let decay = (-elapsed / (cfg.base_target_time_secs * cfg.time_factor)).exp();
    let time_score = (f64::from(max_score(cfg, level)) * decay).round() as u32;

    let mut score = time_score;
    if accel_bonus {
        score = score.saturating_add(cfg.accel_bonus_points);
    }
    if hr_bonus {
        score = score.saturating_add(cfg.hr_bonus_points);
    }
    score
}

/// [`score_passed_level`] fed from a finished level's stats.
pub fn score_for_stats(cfg: &ScoringConfig, level: u32, stats: &PlayerStats) -> u32 {
    score_passed_level(
        cfg,
        level,
        stats.elapsed_secs(),
        stats.accel_bonus_hit,
        stats.heart_rate_bonus_hit,
    )
}

/// Running total after failing `level_failed`.
///
/// Failing the first level wipes the total; later failures keep what was
/// banked before the failed level.
pub fn apply_fail_rule(level_failed: u32, total: u32) -> u32 {
    if level_failed <= 1 { 0 } else { total }
}
