pub mod enums;
pub mod hierarchy;
pub mod records;
pub mod state;
pub mod views;

pub use enums::{BadgeMetric, FocusKind, MissionKind, Priority, ProjectStatus, ThemeMode};
pub use hierarchy::{Area, Goal, Milestone, Project, Subproject, Theme};
pub use records::{ActiveFocus, Badge, BadgeRequirement, FocusSession, Mission, Note, Task, UserStats};
pub use state::AppState;
pub use views::{
    badge_statuses, dashboard, flatten_hierarchy, mission_progress, status_badge, task_summary,
    tree_connector, BadgeStatus, DashboardStats, FlatRow, NodeKind, TaskSummary,
};
