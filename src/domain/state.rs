use super::enums::{MissionKind, Priority, ThemeMode};
use super::hierarchy::{Area, Goal, Project, Subproject, Theme};
use super::records::{ActiveFocus, FocusSession, Mission, Note, Task, UserStats};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Root aggregate holding every collection plus the stats singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub missions: Vec<Mission>,
    pub focus_sessions: Vec<FocusSession>,
    pub user_stats: UserStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_focus_session: Option<ActiveFocus>,
    pub theme: ThemeMode,
    pub areas: Vec<Area>,
    pub themes: Vec<Theme>,
    pub goals: Vec<Goal>,
    pub projects: Vec<Project>,
    pub subprojects: Vec<Subproject>,
}

impl AppState {
    /// Default state for a first run: starter missions and a small sample
    /// hierarchy, timestamped at `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            notes: Vec::new(),
            tasks: Vec::new(),
            missions: vec![
                Mission {
                    id: "1".to_string(),
                    title: "Daily Notes".to_string(),
                    description: "Create 3 notes today".to_string(),
                    kind: MissionKind::Daily,
                    target: 3,
                    current: 0,
                    xp_reward: 100,
                    completed: false,
                    deadline: now + Duration::days(1),
                },
                Mission {
                    id: "2".to_string(),
                    title: "Weekly Focus".to_string(),
                    description: "Complete 10 focus sessions this week".to_string(),
                    kind: MissionKind::Weekly,
                    target: 10,
                    current: 0,
                    xp_reward: 500,
                    completed: false,
                    deadline: now + Duration::days(7),
                },
            ],
            focus_sessions: Vec::new(),
            user_stats: UserStats::default(),
            current_focus_session: None,
            theme: ThemeMode::Light,
            areas: vec![
                Area {
                    id: "1".to_string(),
                    title: "Career Development".to_string(),
                    description: "Professional growth and skill development".to_string(),
                    color: "#8b5cf6".to_string(),
                    priority: Priority::High,
                    created_at: now,
                    updated_at: now,
                },
                Area {
                    id: "2".to_string(),
                    title: "Health & Wellness".to_string(),
                    description: "Physical and mental health initiatives".to_string(),
                    color: "#10b981".to_string(),
                    priority: Priority::High,
                    created_at: now,
                    updated_at: now,
                },
            ],
            themes: vec![Theme {
                id: "1".to_string(),
                area_id: "1".to_string(),
                title: "Web Development".to_string(),
                description: "Frontend and backend development skills".to_string(),
                priority: Priority::High,
                created_at: now,
                updated_at: now,
            }],
            goals: vec![Goal {
                id: "1".to_string(),
                theme_id: "1".to_string(),
                title: "Master React Ecosystem".to_string(),
                description: "Become proficient in React, Next.js, and related tools".to_string(),
                priority: Priority::High,
                start_date: Some(now),
                end_date: Some(now + Duration::days(90)),
                completed: false,
                completed_at: None,
                created_at: now,
                updated_at: now,
            }],
            projects: Vec::new(),
            subprojects: Vec::new(),
        }
    }

    /// An empty state with default stats, for tests and clean imports
    pub fn empty() -> Self {
        Self {
            notes: Vec::new(),
            tasks: Vec::new(),
            missions: Vec::new(),
            focus_sessions: Vec::new(),
            user_stats: UserStats::default(),
            current_focus_session: None,
            theme: ThemeMode::Light,
            areas: Vec::new(),
            themes: Vec::new(),
            goals: Vec::new(),
            projects: Vec::new(),
            subprojects: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_state() {
        let now = Utc::now();
        let state = AppState::seeded(now);

        assert_eq!(state.missions.len(), 2);
        assert_eq!(state.missions[0].deadline, now + Duration::days(1));
        assert_eq!(state.missions[1].kind, MissionKind::Weekly);
        assert_eq!(state.areas.len(), 2);
        assert_eq!(state.themes[0].area_id, state.areas[0].id);
        assert_eq!(state.goals[0].theme_id, state.themes[0].id);
        assert_eq!(state.goals[0].end_date, Some(now + Duration::days(90)));
        assert!(state.projects.is_empty());
        assert!(state.current_focus_session.is_none());
        assert_eq!(state.theme, ThemeMode::Light);
        assert_eq!(state.user_stats, UserStats::default());
    }

    #[test]
    fn test_state_json_top_level_keys() {
        let value = serde_json::to_value(AppState::seeded(Utc::now())).unwrap();
        for key in [
            "notes",
            "tasks",
            "missions",
            "focusSessions",
            "userStats",
            "theme",
            "areas",
            "themes",
            "goals",
            "projects",
            "subprojects",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert!(value.get("currentFocusSession").is_none());
    }
}
