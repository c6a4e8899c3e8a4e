//! The persisted document, read back field by field.
//!
//! Every field is optional so snapshots written by older builds (or by hand)
//! still load: whatever is missing falls back to the default state.

use crate::domain::{
    ActiveFocus, AppState, Area, Badge, FocusSession, Goal, Mission, Note, Project, Subproject,
    Task, Theme, ThemeMode, UserStats,
};
use serde::{Deserialize, Serialize};

/// `UserStats` with every counter optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialUserStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_to_next_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_xp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longest_streak: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<Vec<Badge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_notes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_focus_time: Option<u32>,
}

impl PartialUserStats {
    /// Field-by-field overlay: present values win over `base`
    pub fn merge_over(self, base: UserStats) -> UserStats {
        UserStats {
            level: self.level.unwrap_or(base.level),
            xp: self.xp.unwrap_or(base.xp),
            xp_to_next_level: self.xp_to_next_level.unwrap_or(base.xp_to_next_level),
            total_xp: self.total_xp.unwrap_or(base.total_xp),
            streak: self.streak.unwrap_or(base.streak),
            longest_streak: self.longest_streak.unwrap_or(base.longest_streak),
            badges: self.badges.unwrap_or(base.badges),
            total_notes: self.total_notes.unwrap_or(base.total_notes),
            total_tasks: self.total_tasks.unwrap_or(base.total_tasks),
            total_focus_time: self.total_focus_time.unwrap_or(base.total_focus_time),
        }
    }
}

/// A possibly partial `AppState` as found in storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missions: Option<Vec<Mission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_sessions: Option<Vec<FocusSession>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_stats: Option<PartialUserStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_focus_session: Option<ActiveFocus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<Area>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<Theme>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<Goal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprojects: Option<Vec<Subproject>>,
}

impl Snapshot {
    /// Parse a stored JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Overlay this snapshot on `defaults`.
    ///
    /// Scalars and the focus session replace the default when present,
    /// `userStats` merges field by field, and each collection is taken whole
    /// from the snapshot when present and non-null.
    pub fn merge_over(self, defaults: AppState) -> AppState {
        let user_stats = match self.user_stats {
            Some(partial) => partial.merge_over(defaults.user_stats),
            None => defaults.user_stats,
        };

        AppState {
            notes: self.notes.unwrap_or(defaults.notes),
            tasks: self.tasks.unwrap_or(defaults.tasks),
            missions: self.missions.unwrap_or(defaults.missions),
            focus_sessions: self.focus_sessions.unwrap_or(defaults.focus_sessions),
            user_stats,
            current_focus_session: self
                .current_focus_session
                .or(defaults.current_focus_session),
            theme: self.theme.unwrap_or(defaults.theme),
            areas: self.areas.unwrap_or(defaults.areas),
            themes: self.themes.unwrap_or(defaults.themes),
            goals: self.goals.unwrap_or(defaults.goals),
            projects: self.projects.unwrap_or(defaults.projects),
            subprojects: self.subprojects.unwrap_or(defaults.subprojects),
        }
    }
}

/// Serialize the full state as the stored JSON document
pub fn to_json(state: &AppState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}
