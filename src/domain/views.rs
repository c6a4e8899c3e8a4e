//! Read-time projections over [`AppState`].
//!
//! Nothing in here is stored back into the state: badge unlocks, mission
//! percentages and dashboard counts are recomputed on every read.

use super::enums::{BadgeMetric, ProjectStatus};
use super::hierarchy::{Goal, Project, Subproject, Theme};
use super::records::{Badge, BadgeRequirement, Mission, Note, Task, UserStats};
use super::state::AppState;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// A badge definition together with its computed unlock status
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeStatus {
    pub badge: Badge,
    pub unlocked: bool,
}

fn badge(id: &str, name: &str, description: &str, icon: &str, metric: BadgeMetric, target: u32) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        unlocked_at: None,
        requirement: BadgeRequirement { metric, target },
    }
}

/// The static set of badges a user can earn
pub fn badge_catalogue() -> Vec<Badge> {
    vec![
        badge("1", "Note Taker", "Created your first note", "BookOpen", BadgeMetric::Notes, 1),
        badge("2", "Task Master", "Completed 10 tasks", "CheckSquare", BadgeMetric::Tasks, 10),
        badge("3", "Focus Champion", "Completed 5 hours of focus time", "Clock", BadgeMetric::Focus, 300),
        badge("4", "Streak Keeper", "Maintained a 7-day streak", "Zap", BadgeMetric::Streak, 7),
        badge("5", "Level Up", "Reached level 5", "Star", BadgeMetric::Level, 5),
        badge("6", "Knowledge Seeker", "Created 50 notes", "Brain", BadgeMetric::Notes, 50),
    ]
}

/// Current value of the counter a badge metric measures
pub fn metric_value(stats: &UserStats, metric: BadgeMetric) -> u32 {
    match metric {
        BadgeMetric::Notes => stats.total_notes,
        BadgeMetric::Tasks => stats.total_tasks,
        BadgeMetric::Focus => stats.total_focus_time,
        BadgeMetric::Streak => stats.longest_streak,
        BadgeMetric::Level => stats.level,
    }
}

pub fn is_unlocked(stats: &UserStats, requirement: &BadgeRequirement) -> bool {
    metric_value(stats, requirement.metric) >= requirement.target
}

/// Evaluate every catalogue badge against the stats
pub fn badge_statuses(stats: &UserStats) -> Vec<BadgeStatus> {
    badge_catalogue()
        .into_iter()
        .map(|badge| {
            let unlocked = is_unlocked(stats, &badge.requirement);
            BadgeStatus { badge, unlocked }
        })
        .collect()
}

pub fn unlocked_badge_count(stats: &UserStats) -> usize {
    badge_statuses(stats).iter().filter(|b| b.unlocked).count()
}

/// Mission progress as a percentage, capped at 100
pub fn mission_progress(mission: &Mission) -> f64 {
    if mission.target == 0 {
        return 0.0;
    }
    let percent = mission.current as f64 / mission.target as f64 * 100.0;
    percent.min(100.0)
}

/// Fraction of the current hundred-XP band already filled (0.0 to <1.0)
pub fn level_progress(stats: &UserStats) -> f64 {
    (stats.xp % 100) as f64 / 100.0
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats<'a> {
    pub total_xp: u32,
    pub streak: u32,
    /// Total focus time rounded to whole hours
    pub focus_hours: u32,
    pub level: u32,
    pub note_count: usize,
    pub recent_notes: Vec<&'a Note>,
    pub incomplete_tasks: Vec<&'a Task>,
    pub active_missions: Vec<&'a Mission>,
    pub active_projects: Vec<&'a Project>,
    pub total_areas: usize,
    pub total_projects: usize,
    pub completed_goals: usize,
    pub total_goals: usize,
}

pub fn dashboard(state: &AppState) -> DashboardStats<'_> {
    let recent_start = state.notes.len().saturating_sub(3);

    DashboardStats {
        total_xp: state.user_stats.total_xp,
        streak: state.user_stats.streak,
        focus_hours: (state.user_stats.total_focus_time as f64 / 60.0).round() as u32,
        level: state.user_stats.level,
        note_count: state.notes.len(),
        recent_notes: state.notes[recent_start..].iter().collect(),
        incomplete_tasks: state.tasks.iter().filter(|t| !t.completed).take(5).collect(),
        active_missions: state.missions.iter().filter(|m| !m.completed).collect(),
        active_projects: state
            .projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .take(3)
            .collect(),
        total_areas: state.areas.len(),
        total_projects: state.projects.len(),
        completed_goals: state.goals.iter().filter(|g| g.completed).count(),
        total_goals: state.goals.len(),
    }
}

/// Task counters for the task list header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSummary {
    pub pending: usize,
    pub completed: usize,
    /// Sum of rewards of completed tasks
    pub xp_earned: u32,
}

pub fn task_summary(state: &AppState) -> TaskSummary {
    let mut summary = TaskSummary {
        pending: 0,
        completed: 0,
        xp_earned: 0,
    };
    for task in &state.tasks {
        if task.completed {
            summary.completed += 1;
            summary.xp_earned = summary.xp_earned.saturating_add(task.xp_reward);
        } else {
            summary.pending += 1;
        }
    }
    summary
}

/// Focus minutes from sessions that started on `day` in the given timezone
pub fn focus_minutes_on<Tz: TimeZone>(state: &AppState, day: NaiveDate, tz: &Tz) -> u32 {
    state
        .focus_sessions
        .iter()
        .filter(|s| s.start_time.with_timezone(tz).date_naive() == day)
        .map(|s| s.duration)
        .sum()
}

/// Focus minutes from sessions that started at or after `since`
pub fn focus_minutes_since(state: &AppState, since: DateTime<Utc>) -> u32 {
    state
        .focus_sessions
        .iter()
        .filter(|s| s.start_time >= since)
        .map(|s| s.duration)
        .sum()
}

pub fn themes_of<'a>(state: &'a AppState, area_id: &str) -> Vec<&'a Theme> {
    state.themes.iter().filter(|t| t.area_id == area_id).collect()
}

pub fn goals_of<'a>(state: &'a AppState, theme_id: &str) -> Vec<&'a Goal> {
    state.goals.iter().filter(|g| g.theme_id == theme_id).collect()
}

pub fn projects_of<'a>(state: &'a AppState, goal_id: &str) -> Vec<&'a Project> {
    state.projects.iter().filter(|p| p.goal_id == goal_id).collect()
}

pub fn subprojects_of<'a>(state: &'a AppState, project_id: &str) -> Vec<&'a Subproject> {
    state
        .subprojects
        .iter()
        .filter(|s| s.project_id == project_id)
        .collect()
}

/// Tier of a row in the flattened hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Area,
    Theme,
    Goal,
    Project,
    Subproject,
}

/// A flattened row for printing the knowledge hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow<'a> {
    pub kind: NodeKind,
    /// Depth in the tree (0 = area, 4 = subproject)
    pub depth: usize,
    /// Whether this is the last child of its parent
    pub is_last: bool,
    pub id: &'a str,
    pub title: &'a str,
}

/// Flatten the hierarchy into display order, starting from areas.
///
/// Orphans whose parent no longer exists are not reachable and are skipped.
pub fn flatten_hierarchy(state: &AppState) -> Vec<FlatRow<'_>> {
    let mut rows = Vec::new();
    let area_count = state.areas.len();

    for (ai, area) in state.areas.iter().enumerate() {
        rows.push(FlatRow {
            kind: NodeKind::Area,
            depth: 0,
            is_last: ai + 1 == area_count,
            id: &area.id,
            title: &area.title,
        });

        let themes = themes_of(state, &area.id);
        for (ti, theme) in themes.iter().enumerate() {
            rows.push(FlatRow {
                kind: NodeKind::Theme,
                depth: 1,
                is_last: ti + 1 == themes.len(),
                id: &theme.id,
                title: &theme.title,
            });

            let goals = goals_of(state, &theme.id);
            for (gi, goal) in goals.iter().enumerate() {
                rows.push(FlatRow {
                    kind: NodeKind::Goal,
                    depth: 2,
                    is_last: gi + 1 == goals.len(),
                    id: &goal.id,
                    title: &goal.title,
                });

                let projects = projects_of(state, &goal.id);
                for (pi, project) in projects.iter().enumerate() {
                    rows.push(FlatRow {
                        kind: NodeKind::Project,
                        depth: 3,
                        is_last: pi + 1 == projects.len(),
                        id: &project.id,
                        title: &project.title,
                    });

                    let subprojects = subprojects_of(state, &project.id);
                    for (si, sub) in subprojects.iter().enumerate() {
                        rows.push(FlatRow {
                            kind: NodeKind::Subproject,
                            depth: 4,
                            is_last: si + 1 == subprojects.len(),
                            id: &sub.id,
                            title: &sub.title,
                        });
                    }
                }
            }
        }
    }

    rows
}

/// Get tree connector for nested rows
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}

/// Short status label for projects and subprojects
pub fn status_badge(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "◇ PLANNING",
        ProjectStatus::Active => "▶ ACTIVE",
        ProjectStatus::Paused => "⏸ PAUSED",
        ProjectStatus::Completed => "✓ DONE",
        ProjectStatus::Cancelled => "✗ CANCELLED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::{FocusKind, MissionKind, Priority};
    use crate::domain::records::FocusSession;
    use chrono::Duration;

    fn session(start: DateTime<Utc>, minutes: u32) -> FocusSession {
        FocusSession {
            id: start.timestamp_millis().to_string(),
            duration: minutes,
            kind: FocusKind::Pomodoro,
            tags: vec![],
            start_time: start,
            end_time: start + Duration::minutes(minutes as i64),
            xp_earned: minutes * 2,
        }
    }

    fn task(id: &str, completed: bool, priority: Priority) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: None,
            completed,
            priority,
            tags: vec![],
            xp_reward: priority.xp_reward(),
            created_at: Utc::now(),
            completed_at: None,
            project_id: None,
            subproject_id: None,
        }
    }

    #[test]
    fn test_badges_locked_for_new_user() {
        let stats = UserStats::default();
        let statuses = badge_statuses(&stats);
        assert_eq!(statuses.len(), 6);
        assert!(statuses.iter().all(|b| !b.unlocked));
    }

    #[test]
    fn test_badges_unlock_on_thresholds() {
        let mut stats = UserStats::default();
        stats.total_notes = 1;
        stats.total_focus_time = 300;
        stats.level = 5;
        stats.longest_streak = 6;

        let unlocked: Vec<String> = badge_statuses(&stats)
            .into_iter()
            .filter(|b| b.unlocked)
            .map(|b| b.badge.name)
            .collect();

        assert_eq!(unlocked, vec!["Note Taker", "Focus Champion", "Level Up"]);
        assert_eq!(unlocked_badge_count(&stats), 3);
    }

    #[test]
    fn test_mission_progress_capped() {
        let mut mission = AppState::seeded(Utc::now()).missions[0].clone();
        assert_eq!(mission.kind, MissionKind::Daily);
        assert_eq!(mission_progress(&mission), 0.0);

        mission.current = 1;
        assert!((mission_progress(&mission) - 100.0 / 3.0).abs() < 1e-9);

        mission.current = 7;
        assert_eq!(mission_progress(&mission), 100.0);

        mission.target = 0;
        assert_eq!(mission_progress(&mission), 0.0);
    }

    #[test]
    fn test_level_progress() {
        let mut stats = UserStats::default();
        stats.xp = 175;
        assert!((level_progress(&stats) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_dashboard_counts() {
        let mut state = AppState::seeded(Utc::now());
        state.goals[0].completed = true;
        state.user_stats.total_focus_time = 89;
        for i in 0..7 {
            state.tasks.push(task(&i.to_string(), i == 0, Priority::Low));
        }

        let stats = dashboard(&state);
        assert_eq!(stats.total_areas, 2);
        assert_eq!(stats.completed_goals, 1);
        assert_eq!(stats.total_goals, 1);
        assert_eq!(stats.focus_hours, 1);
        assert_eq!(stats.incomplete_tasks.len(), 5);
        assert_eq!(stats.incomplete_tasks[0].id, "1");
        assert_eq!(stats.active_missions.len(), 2);
        assert!(stats.active_projects.is_empty());
    }

    #[test]
    fn test_task_summary() {
        let mut state = AppState::empty();
        state.tasks.push(task("a", true, Priority::High));
        state.tasks.push(task("b", true, Priority::Low));
        state.tasks.push(task("c", false, Priority::Medium));

        let summary = task_summary(&state);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.xp_earned, 60);
    }

    #[test]
    fn test_focus_minutes_windows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut state = AppState::empty();
        state.focus_sessions.push(session(now - Duration::days(10), 90));
        state.focus_sessions.push(session(now - Duration::days(2), 45));
        state.focus_sessions.push(session(now - Duration::hours(1), 25));

        assert_eq!(focus_minutes_on(&state, now.date_naive(), &Utc), 25);
        assert_eq!(focus_minutes_since(&state, now - Duration::days(7)), 70);
    }

    #[test]
    fn test_flatten_hierarchy() {
        let state = AppState::seeded(Utc::now());
        let rows = flatten_hierarchy(&state);

        let kinds: Vec<NodeKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Area, NodeKind::Theme, NodeKind::Goal, NodeKind::Area]
        );
        assert_eq!(rows[2].depth, 2);
        assert!(rows[1].is_last);
        assert!(!rows[0].is_last);
        assert!(rows[3].is_last);
        assert_eq!(rows[3].title, "Health & Wellness");
    }

    #[test]
    fn test_flatten_hierarchy_skips_orphans() {
        let mut state = AppState::seeded(Utc::now());
        state.themes.clear();

        let rows = flatten_hierarchy(&state);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == NodeKind::Area));
    }

    #[test]
    fn test_tree_connector() {
        assert_eq!(tree_connector(false), "├─");
        assert_eq!(tree_connector(true), "└─");
    }

    #[test]
    fn test_status_badge() {
        assert_eq!(status_badge(ProjectStatus::Active), "▶ ACTIVE");
        assert_eq!(status_badge(ProjectStatus::Completed), "✓ DONE");
    }
}
