use super::enums::{BadgeMetric, FocusKind, MissionKind, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-form note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ids of other notes
    #[serde(default)]
    pub linked_notes: Vec<String>,
    /// Ids of projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_projects: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A to-do item worth XP when completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fixed at creation from the priority
    pub xp_reward: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subproject_id: Option<String>,
}

/// A daily or weekly challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MissionKind,
    pub target: u32,
    pub current: u32,
    pub xp_reward: u32,
    pub completed: bool,
    pub deadline: DateTime<Utc>,
}

/// A committed focus session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: String,
    /// Minutes
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: FocusKind,
    #[serde(default)]
    pub tags: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub xp_earned: u32,
}

/// The session currently being timed, not yet committed to history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFocus {
    pub start_time: DateTime<Utc>,
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: FocusKind,
}

/// What a badge asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRequirement {
    #[serde(rename = "type")]
    pub metric: BadgeMetric,
    pub target: u32,
}

/// A badge definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Serialized as `requirements` for compatibility with existing snapshots
    #[serde(rename = "requirements")]
    pub requirement: BadgeRequirement,
}

/// Aggregate gamification counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub total_xp: u32,
    pub streak: u32,
    pub longest_streak: u32,
    pub badges: Vec<Badge>,
    pub total_notes: u32,
    pub total_tasks: u32,
    /// Minutes
    pub total_focus_time: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: 100,
            total_xp: 0,
            streak: 0,
            longest_streak: 0,
            badges: Vec::new(),
            total_notes: 0,
            total_tasks: 0,
            total_focus_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_json_uses_camel_case() {
        let task = Task {
            id: "1".to_string(),
            title: "Write report".to_string(),
            description: None,
            completed: false,
            priority: Priority::High,
            tags: vec![],
            xp_reward: 50,
            created_at: Utc::now(),
            completed_at: None,
            project_id: Some("p1".to_string()),
            subproject_id: None,
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["xpReward"], 50);
        assert_eq!(value["priority"], "high");
        assert_eq!(value["projectId"], "p1");
        assert!(value.get("completedAt").is_none());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_focus_session_parses_stored_shape() {
        let json = r#"{
            "id": "1700000000000",
            "duration": 25,
            "type": "deep-work",
            "tags": [],
            "startTime": "2024-01-01T09:00:00.000Z",
            "endTime": "2024-01-01T09:25:00.000Z",
            "xpEarned": 50
        }"#;

        let session: FocusSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.kind, FocusKind::DeepWork);
        assert_eq!(session.xp_earned, 50);
        assert_eq!(
            session.end_time.signed_duration_since(session.start_time).num_minutes(),
            25
        );
    }

    #[test]
    fn test_user_stats_default() {
        let stats = UserStats::default();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.xp_to_next_level, 100);
        assert_eq!(stats.total_xp, 0);
        assert!(stats.badges.is_empty());
    }
}
