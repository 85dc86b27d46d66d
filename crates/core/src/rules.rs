//! Rules module - tunable scoring and timing configuration
//!
//! Every number the session plays by lives in [`Rules`]. Defaults come from
//! the constants in `blockfall-types`; a JSON file can override any subset:
//!
//! ```
//! use blockfall_core::Rules;
//!
//! let rules = Rules::from_json_str(r#"{ "lock_reset_cap": 15 }"#).unwrap();
//! assert_eq!(rules.lock_reset_cap, 15);
//! assert_eq!(rules.line_scores, [0, 100, 300, 500, 800]);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    BACK_TO_BACK_GOAL_REDUCTION, BACK_TO_BACK_MULTIPLIER, DEFAULT_AUTO_REPEAT_INTERVAL,
    DEFAULT_AUTO_SHIFT_DELAY, GOAL_PER_LEVEL, GOAL_REDUCTIONS, GRAVITY_BASE, HARD_DROP_POINTS,
    LINE_SCORES, LOCK_RESET_CAP, SOFT_DROP_BASE, SOFT_DROP_INTERVAL, SOFT_DROP_POINTS,
};

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid rules: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Points per line count at level 1, indexed by lines cleared
    pub line_scores: [u32; 5],
    pub goal_reductions: [i32; 5],
    pub back_to_back_goal_reduction: i32,
    pub back_to_back_multiplier: f64,
    pub goal_per_level: i32,
    pub gravity_base: f64,
    pub soft_drop_interval: f64,
    pub soft_drop_base: f64,
    /// Seconds a direction is held before auto-repeat kicks in
    pub auto_shift_delay: f64,
    pub auto_repeat_interval: f64,
    pub lock_reset_cap: u8,
    pub soft_drop_points: u32,
    pub hard_drop_points: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            line_scores: LINE_SCORES,
            goal_reductions: GOAL_REDUCTIONS,
            back_to_back_goal_reduction: BACK_TO_BACK_GOAL_REDUCTION,
            back_to_back_multiplier: BACK_TO_BACK_MULTIPLIER,
            goal_per_level: GOAL_PER_LEVEL,
            gravity_base: GRAVITY_BASE,
            soft_drop_interval: SOFT_DROP_INTERVAL,
            soft_drop_base: SOFT_DROP_BASE,
            auto_shift_delay: DEFAULT_AUTO_SHIFT_DELAY,
            auto_repeat_interval: DEFAULT_AUTO_REPEAT_INTERVAL,
            lock_reset_cap: LOCK_RESET_CAP,
            soft_drop_points: SOFT_DROP_POINTS,
            hard_drop_points: HARD_DROP_POINTS,
        }
    }
}

impl Rules {
    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        let positive = [
            ("back_to_back_multiplier", self.back_to_back_multiplier),
            ("gravity_base", self.gravity_base),
            ("soft_drop_interval", self.soft_drop_interval),
            ("soft_drop_base", self.soft_drop_base),
            ("auto_shift_delay", self.auto_shift_delay),
            ("auto_repeat_interval", self.auto_repeat_interval),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(RulesError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        if self.goal_per_level <= 0 {
            return Err(RulesError::Invalid {
                field: "goal_per_level",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Lines needed to leave `level`
    pub fn goal_for_level(&self, level: u32) -> i32 {
        i32::try_from(level)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.goal_per_level)
    }
}

/// Level-derived intervals, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub fall: f64,
    pub soft_drop: f64,
    /// Time a grounded piece waits before locking
    pub lock: f64,
}

impl Timing {
    /// Intervals stay above zero however high the level
    pub fn for_level(rules: &Rules, level: u32) -> Self {
        let steps = i32::try_from(level.max(1) - 1).unwrap_or(i32::MAX);
        let fall = (1.0 / rules.gravity_base.powi(steps)).max(f64::MIN_POSITIVE);
        Self {
            fall,
            soft_drop: (rules.soft_drop_interval / rules.soft_drop_base.powi(steps))
                .max(f64::MIN_POSITIVE),
            lock: (fall / 2.0).max(f64::MIN_POSITIVE),
        }
    }
}
