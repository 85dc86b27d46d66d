//! Scoring module - line clear and drop scoring
//!
//! - Line clears score `line_scores[lines] * level`.
//! - A tetris straight after a tetris is back-to-back: the tetris score is
//!   multiplied by `back_to_back_multiplier` and the goal drops further.
//! - Soft drop and hard drop award points per row travelled.

use crate::rules::Rules;
use crate::types::LineScore;

/// Points for clearing `lines` rows at `level`.
/// `back_to_back` only matters for a tetris
pub fn line_clear_score(rules: &Rules, lines: usize, level: u32, back_to_back: bool) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    let base = rules.line_scores[lines].saturating_mul(level);
    if lines == 4 && back_to_back {
        (base as f64 * rules.back_to_back_multiplier) as u32
    } else {
        base
    }
}

/// How far the level goal counts down for a clear
pub fn goal_reduction(rules: &Rules, lines: usize, back_to_back: bool) -> i32 {
    match lines {
        4 if back_to_back => rules.back_to_back_goal_reduction,
        1..=4 => rules.goal_reductions[lines],
        _ => 0,
    }
}

/// Category announced for a clear, None for zero lines
pub fn line_score_category(lines: usize, back_to_back: bool) -> Option<LineScore> {
    match lines {
        1 => Some(LineScore::Single),
        2 => Some(LineScore::Double),
        3 => Some(LineScore::Triple),
        4 if back_to_back => Some(LineScore::BackToBack),
        4 => Some(LineScore::Tetris),
        _ => None,
    }
}

/// Calculate drop score
/// soft drop: `soft_drop_points` per row
/// hard drop: `hard_drop_points` per row
pub fn drop_score(rules: &Rules, rows: u32, hard: bool) -> u32 {
    let per_row = if hard {
        rules.hard_drop_points
    } else {
        rules.soft_drop_points
    };
    rows.saturating_mul(per_row)
}
