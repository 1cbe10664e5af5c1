//! Scoring module - points for a single placement
//!
//! A placement always earns one point per block placed. When it clears lines:
//! - each line is worth `LINE_CLEAR_POINTS`
//! - the combo bonus is `COMBO_POINTS_PER_LINE * combo * lines`, using the
//!   combo count from *before* this placement
//! - clearing more than one line adds `MULTI_LINE_POINTS_PER_LINE * lines`

use crate::types::{COMBO_POINTS_PER_LINE, LINE_CLEAR_POINTS, MULTI_LINE_POINTS_PER_LINE};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// One point per placed block.
    pub block_points: u32,
    /// Flat points for the cleared lines.
    pub line_points: u32,
    /// Bonus from the running combo.
    pub combo_bonus: u32,
    /// Bonus for clearing several lines at once.
    pub multi_line_bonus: u32,
    pub total: u32,
}

/// Flat points for `lines` cleared lines
pub fn calculate_line_points(lines: u32) -> u32 {
    LINE_CLEAR_POINTS.saturating_mul(lines)
}

/// Combo bonus for `lines` cleared with `combo` previous consecutive clears
pub fn calculate_combo_bonus(combo: u32, lines: u32) -> u32 {
    COMBO_POINTS_PER_LINE
        .saturating_mul(combo)
        .saturating_mul(lines)
}

/// Extra points when more than one line clears at once
pub fn calculate_multi_line_bonus(lines: u32) -> u32 {
    if lines > 1 {
        MULTI_LINE_POINTS_PER_LINE.saturating_mul(lines)
    } else {
        0
    }
}

/// Calculate the complete score of one placement.
///
/// `combo` is the session's combo counter before the placement is applied.
pub fn calculate_score(blocks: u32, lines: u32, combo: u32) -> ScoreResult {
    if lines == 0 {
        return ScoreResult {
            block_points: blocks,
            total: blocks,
            ..ScoreResult::default()
        };
    }

    let line_points = calculate_line_points(lines);
    let combo_bonus = calculate_combo_bonus(combo, lines);
    let multi_line_bonus = calculate_multi_line_bonus(lines);
    let total = blocks
        .saturating_add(line_points)
        .saturating_add(combo_bonus)
        .saturating_add(multi_line_bonus);

    ScoreResult {
        block_points: blocks,
        line_points,
        combo_bonus,
        multi_line_bonus,
        total,
    }
}

/// Popup label for a clear of `lines` lines
pub fn clear_label(lines: u32) -> String {
    match lines {
        0 => String::new(),
        1 => "CLEAR".to_string(),
        2 => "DOUBLE".to_string(),
        3 => "TRIPLE".to_string(),
        n => format!("{n} LINES"),
    }
}
