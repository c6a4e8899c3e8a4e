use crate::domain::{
    AppState, Area, FocusKind, FocusSession, Goal, Note, Priority, Project, ProjectStatus,
    Subproject, Task, Theme,
};
use crate::engine::gamification::{AREA_XP, GOAL_XP, PROJECT_XP, THEME_XP};
use crate::engine::{apply_at, Action, FocusRequest};
use crate::persistence::{snapshot, Snapshot, StateStore, STATE_KEY};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Input rejected before any action is dispatched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("{kind} not found: {id}")]
    UnknownParent { kind: &'static str, id: String },

    #[error("focus duration must be at least one minute")]
    InvalidDuration,
}

/// Common fields for new knowledge hub entries
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl NewEntry {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Narrative fields only projects carry
#[derive(Debug, Clone, Default)]
pub struct ProjectBrief {
    pub summary: String,
    pub context: String,
    pub deliverables: Vec<String>,
}

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub project_id: Option<String>,
    pub subproject_id: Option<String>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn checked_title(title: &str) -> Result<String, CommandError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Owns the application state and the store it is persisted to.
///
/// All changes go through [`App::dispatch`], which runs the reducer and
/// writes the new snapshot. Storage failures are logged and otherwise
/// ignored: the in-memory state stays authoritative.
///
/// A stored snapshot that cannot be parsed is copied aside before anything
/// is written over it. If neither reading nor the copy succeeds, the session
/// runs without saving.
pub struct App<S: StateStore> {
    state: AppState,
    store: S,
    persisting: bool,
}

impl<S: StateStore> App<S> {
    /// Build the default state and merge in whatever `store` holds
    pub fn open(store: S) -> Self {
        Self::open_at(store, Utc::now())
    }

    pub fn open_at(store: S, now: DateTime<Utc>) -> Self {
        let defaults = AppState::seeded(now);
        let mut persisting = true;

        let state = match store.load(STATE_KEY) {
            Ok(Some(blob)) => match Snapshot::from_json(&blob) {
                Ok(snapshot) => apply_at(&defaults, Action::LoadState(Box::new(snapshot)), now),
                Err(e) => {
                    tracing::warn!(error = %e, "stored snapshot is malformed, starting from defaults");
                    match store.backup(STATE_KEY) {
                        Ok(Some(copy)) => {
                            tracing::warn!(backup = %copy, "kept a copy of the unreadable snapshot");
                        }
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "could not back up the unreadable snapshot, changes will not be saved");
                            persisting = false;
                        }
                    }
                    defaults
                }
            },
            Ok(None) => {
                tracing::debug!("no stored snapshot, starting from defaults");
                defaults
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load snapshot, starting from defaults, changes will not be saved");
                persisting = false;
                defaults
            }
        };

        Self {
            state,
            store,
            persisting,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an action; returns whether the state changed
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.dispatch_at(action, Utc::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: DateTime<Utc>) -> bool {
        let kind = action.kind();
        let next = apply_at(&self.state, action, now);
        if next == self.state {
            tracing::debug!(action = kind, "no-op");
            return false;
        }

        tracing::debug!(action = kind, "applied");
        self.state = next;
        self.persist();
        true
    }

    /// Whether changes are written back to the store
    pub fn is_persisting(&self) -> bool {
        self.persisting
    }

    /// Write the current state to the store, logging any failure
    fn persist(&self) {
        if !self.persisting {
            tracing::debug!("persistence disabled for this session");
            return;
        }
        let json = match snapshot::to_json(&self.state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize state");
                return;
            }
        };
        if let Err(e) = self.store.save(STATE_KEY, &json) {
            tracing::warn!(error = %e, "failed to persist state");
        }
    }

    pub fn add_note(
        &mut self,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<String, CommandError> {
        let title = checked_title(title)?;
        let now = Utc::now();
        let id = new_id();

        self.dispatch_at(
            Action::AddNote(Note {
                id: id.clone(),
                title,
                content: content.to_string(),
                tags,
                linked_notes: Vec::new(),
                linked_projects: None,
                created_at: now,
                updated_at: now,
            }),
            now,
        );
        Ok(id)
    }

    pub fn add_task(&mut self, input: NewTask) -> Result<String, CommandError> {
        let title = checked_title(&input.title)?;
        let id = new_id();

        self.dispatch(Action::AddTask(Task {
            id: id.clone(),
            title,
            description: input.description.filter(|d| !d.trim().is_empty()),
            completed: false,
            priority: input.priority,
            tags: input.tags,
            xp_reward: input.priority.xp_reward(),
            created_at: Utc::now(),
            completed_at: None,
            project_id: input.project_id,
            subproject_id: input.subproject_id,
        }));
        Ok(id)
    }

    /// Complete a task; false when it is unknown or already done
    pub fn complete_task(&mut self, id: &str) -> bool {
        self.dispatch(Action::CompleteTask(id.to_string()))
    }

    pub fn start_focus(&mut self, minutes: u32, kind: FocusKind) -> Result<(), CommandError> {
        if minutes == 0 {
            return Err(CommandError::InvalidDuration);
        }
        self.dispatch(Action::StartFocusSession(FocusRequest {
            duration: minutes,
            kind,
        }));
        Ok(())
    }

    /// Commit the running focus session, returning it
    pub fn end_focus(&mut self) -> Option<FocusSession> {
        if self.dispatch(Action::EndFocusSession) {
            self.state.focus_sessions.last().cloned()
        } else {
            None
        }
    }

    pub fn toggle_theme(&mut self) {
        self.dispatch(Action::ToggleTheme);
    }

    pub fn add_area(&mut self, entry: NewEntry, color: &str) -> Result<String, CommandError> {
        let title = checked_title(&entry.title)?;
        let now = Utc::now();
        let id = new_id();

        self.dispatch_at(
            Action::AddArea(Area {
                id: id.clone(),
                title,
                description: entry.description,
                color: color.to_string(),
                priority: entry.priority,
                created_at: now,
                updated_at: now,
            }),
            now,
        );
        self.dispatch_at(Action::AddXp(AREA_XP), now);
        Ok(id)
    }

    pub fn add_theme(&mut self, area_id: &str, entry: NewEntry) -> Result<String, CommandError> {
        let title = checked_title(&entry.title)?;
        if !self.state.areas.iter().any(|a| a.id == area_id) {
            return Err(CommandError::UnknownParent {
                kind: "area",
                id: area_id.to_string(),
            });
        }
        let now = Utc::now();
        let id = new_id();

        self.dispatch_at(
            Action::AddTheme(Theme {
                id: id.clone(),
                area_id: area_id.to_string(),
                title,
                description: entry.description,
                priority: entry.priority,
                created_at: now,
                updated_at: now,
            }),
            now,
        );
        self.dispatch_at(Action::AddXp(THEME_XP), now);
        Ok(id)
    }

    pub fn add_goal(&mut self, theme_id: &str, entry: NewEntry) -> Result<String, CommandError> {
        let title = checked_title(&entry.title)?;
        if !self.state.themes.iter().any(|t| t.id == theme_id) {
            return Err(CommandError::UnknownParent {
                kind: "theme",
                id: theme_id.to_string(),
            });
        }
        let now = Utc::now();
        let id = new_id();

        self.dispatch_at(
            Action::AddGoal(Goal {
                id: id.clone(),
                theme_id: theme_id.to_string(),
                title,
                description: entry.description,
                priority: entry.priority,
                start_date: entry.start_date,
                end_date: entry.end_date,
                completed: false,
                completed_at: None,
                created_at: now,
                updated_at: now,
            }),
            now,
        );
        self.dispatch_at(Action::AddXp(GOAL_XP), now);
        Ok(id)
    }

    pub fn add_project(
        &mut self,
        goal_id: &str,
        entry: NewEntry,
        brief: ProjectBrief,
    ) -> Result<String, CommandError> {
        let title = checked_title(&entry.title)?;
        if !self.state.goals.iter().any(|g| g.id == goal_id) {
            return Err(CommandError::UnknownParent {
                kind: "goal",
                id: goal_id.to_string(),
            });
        }
        let now = Utc::now();
        let id = new_id();

        self.dispatch_at(
            Action::AddProject(Project {
                id: id.clone(),
                goal_id: goal_id.to_string(),
                title,
                description: entry.description,
                summary: brief.summary,
                context: brief.context,
                deliverables: brief
                    .deliverables
                    .into_iter()
                    .filter(|d| !d.trim().is_empty())
                    .collect(),
                priority: entry.priority,
                status: ProjectStatus::Planning,
                start_date: entry.start_date,
                end_date: entry.end_date,
                progress: 0,
                milestones: Vec::new(),
                linked_notes: Vec::new(),
                linked_projects: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
            now,
        );
        self.dispatch_at(Action::AddXp(PROJECT_XP), now);
        Ok(id)
    }

    pub fn add_subproject(
        &mut self,
        project_id: &str,
        entry: NewEntry,
    ) -> Result<String, CommandError> {
        let title = checked_title(&entry.title)?;
        if !self.state.projects.iter().any(|p| p.id == project_id) {
            return Err(CommandError::UnknownParent {
                kind: "project",
                id: project_id.to_string(),
            });
        }
        let now = Utc::now();
        let id = new_id();

        self.dispatch_at(
            Action::AddSubproject(Subproject {
                id: id.clone(),
                project_id: project_id.to_string(),
                title,
                description: entry.description,
                priority: entry.priority,
                status: ProjectStatus::Planning,
                start_date: entry.start_date,
                end_date: entry.end_date,
                progress: 0,
                created_at: now,
                updated_at: now,
            }),
            now,
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThemeMode;
    use crate::persistence::{FileStore, MemoryStore};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn create_test_app() -> App<MemoryStore> {
        App::open(MemoryStore::new())
    }

    #[test]
    fn test_open_empty_store_uses_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let app = App::open_at(MemoryStore::new(), now);
        assert_eq!(app.state(), &AppState::seeded(now));
    }

    #[test]
    fn test_open_merges_stored_snapshot() {
        let store = MemoryStore::with_blob(STATE_KEY, r#"{"theme":"dark","notes":[]}"#);
        let app = App::open(store);
        assert_eq!(app.state().theme, ThemeMode::Dark);
        assert_eq!(app.state().areas.len(), 2);
    }

    #[test]
    fn test_open_ignores_malformed_snapshot() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryStore::with_blob(STATE_KEY, "not json");
        let app = App::open_at(store, now);
        assert_eq!(app.state(), &AppState::seeded(now));
    }

    #[test]
    fn test_malformed_snapshot_is_kept_before_first_save() {
        let store = MemoryStore::with_blob(STATE_KEY, "{\"progress\": 300");
        let mut app = App::open(store);
        assert!(app.is_persisting());

        assert!(app.dispatch(Action::ToggleTheme));
        assert_eq!(
            app.store().get("lifemaster-state.bak"),
            Some("{\"progress\": 300".to_string())
        );
        let blob = app.store().get(STATE_KEY).unwrap();
        assert_eq!(Snapshot::from_json(&blob).unwrap().theme, Some(ThemeMode::Dark));
    }

    #[test]
    fn test_malformed_file_snapshot_is_backed_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path());
        let bad = r#"{"currentFocusSession": {"startTime": "2024-01-01T00:00:00Z", "duration": 5, "type": "yoga"}}"#;
        store.save(STATE_KEY, bad).unwrap();

        let mut app = App::open(store);
        app.dispatch(Action::AddXp(10));

        let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.to_string_lossy().contains(".bak."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), bad);
    }

    #[test]
    fn test_dispatch_persists_changes() {
        let mut app = create_test_app();
        assert!(app.dispatch(Action::ToggleTheme));

        let blob = app.store().get(STATE_KEY).unwrap();
        let stored = Snapshot::from_json(&blob).unwrap();
        assert_eq!(stored.theme, Some(ThemeMode::Dark));
    }

    #[test]
    fn test_noop_dispatch_does_not_write() {
        let mut app = create_test_app();
        assert!(!app.dispatch(Action::CompleteTask("missing".to_string())));
        assert!(app.store().get(STATE_KEY).is_none());
    }

    #[test]
    fn test_unavailable_store_keeps_memory_state() {
        let mut app = App::open(MemoryStore::unavailable());
        assert!(!app.is_persisting());
        app.dispatch(Action::AddXp(30));
        assert_eq!(app.state().user_stats.total_xp, 30);
    }

    #[test]
    fn test_add_task_rewards_by_priority() {
        let mut app = create_test_app();
        let id = app
            .add_task(NewTask {
                title: "Ship release".to_string(),
                priority: Priority::High,
                description: Some("   ".to_string()),
                ..NewTask::default()
            })
            .unwrap();

        let task = &app.state().tasks[0];
        assert_eq!(task.id, id);
        assert_eq!(task.xp_reward, 50);
        assert_eq!(task.description, None);
        assert!(!task.completed);

        assert!(app.complete_task(&id));
        assert!(!app.complete_task(&id));
        assert_eq!(app.state().user_stats.total_xp, 50);
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut app = create_test_app();
        assert_eq!(app.add_note("  ", "body", vec![]), Err(CommandError::EmptyTitle));
        assert_eq!(
            app.add_task(NewTask::default()),
            Err(CommandError::EmptyTitle)
        );
        assert!(app.state().notes.is_empty());
    }

    #[test]
    fn test_add_note_counts() {
        let mut app = create_test_app();
        app.add_note("Idea", "Use a reducer", vec!["arch".to_string()])
            .unwrap();
        assert_eq!(app.state().user_stats.total_notes, 1);
        assert_eq!(app.state().notes[0].tags, vec!["arch".to_string()]);
    }

    #[test]
    fn test_hierarchy_commands_grant_xp() {
        let mut app = create_test_app();
        let area = app
            .add_area(NewEntry::titled("Finance").priority(Priority::Low), "#f59e0b")
            .unwrap();
        let theme = app.add_theme(&area, NewEntry::titled("Investing")).unwrap();
        let goal = app.add_goal(&theme, NewEntry::titled("Index funds")).unwrap();
        let project = app
            .add_project(
                &goal,
                NewEntry::titled("Open brokerage account"),
                ProjectBrief {
                    deliverables: vec!["Account".to_string(), String::new()],
                    ..ProjectBrief::default()
                },
            )
            .unwrap();
        app.add_subproject(&project, NewEntry::titled("Compare fees"))
            .unwrap();

        let stats = &app.state().user_stats;
        assert_eq!(stats.total_xp, 50 + 40 + 75 + 100);
        assert_eq!(stats.level, 3);
        assert_eq!(app.state().projects[0].deliverables, vec!["Account".to_string()]);
        assert_eq!(app.state().subprojects[0].project_id, project);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut app = create_test_app();
        let err = app
            .add_goal("missing", NewEntry::titled("Orphan"))
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::UnknownParent {
                kind: "theme",
                id: "missing".to_string()
            }
        );
        assert_eq!(app.state().goals.len(), 1);
    }

    #[test]
    fn test_focus_lifecycle() {
        let mut app = create_test_app();
        assert_eq!(app.start_focus(0, FocusKind::Pomodoro), Err(CommandError::InvalidDuration));
        assert!(app.end_focus().is_none());

        app.start_focus(25, FocusKind::Pomodoro).unwrap();
        let session = app.end_focus().unwrap();
        assert_eq!(session.xp_earned, 50);
        assert_eq!(app.state().user_stats.total_focus_time, 25);
        assert!(app.state().current_focus_session.is_none());
    }

    #[test]
    fn test_reopen_from_file_store() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut app = App::open(FileStore::new(temp_dir.path()));
        let id = app
            .add_task(NewTask {
                title: "Persist me".to_string(),
                ..NewTask::default()
            })
            .unwrap();
        app.complete_task(&id);
        let saved = app.state().clone();

        let reopened = App::open(FileStore::new(temp_dir.path()));
        assert_eq!(reopened.state(), &saved);
    }
}
