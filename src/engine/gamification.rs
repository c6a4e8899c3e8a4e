//! XP accrual and level formulas.
//!
//! Levels are bands of 100 XP over the stored `xp` counter. Every
//! transition that credits XP goes through [`credit_xp`], so `level` and
//! `xp_to_next_level` never drift from `xp`.

use crate::domain::UserStats;

pub const XP_PER_LEVEL: u32 = 100;

/// XP granted for creating an area
pub const AREA_XP: u32 = 50;
/// XP granted for creating a theme
pub const THEME_XP: u32 = 40;
/// XP granted for creating a goal
pub const GOAL_XP: u32 = 75;
/// XP granted for creating a project
pub const PROJECT_XP: u32 = 100;

/// XP earned by a focus session of `minutes`
pub fn focus_xp(minutes: u32) -> u32 {
    minutes.saturating_mul(2)
}

pub fn level_for(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// XP still missing before the next band starts, always in `1..=100`
pub fn xp_to_next_level(xp: u32) -> u32 {
    XP_PER_LEVEL - xp % XP_PER_LEVEL
}

/// Stats with `amount` credited to both XP counters and the level recomputed
pub fn credit_xp(stats: &UserStats, amount: u32) -> UserStats {
    let xp = stats.xp.saturating_add(amount);
    UserStats {
        xp,
        total_xp: stats.total_xp.saturating_add(amount),
        level: level_for(xp),
        xp_to_next_level: xp_to_next_level(xp),
        ..stats.clone()
    }
}
