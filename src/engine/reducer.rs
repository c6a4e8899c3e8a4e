use super::action::Action;
use super::collections::{appended, cascade_delete, replaced, without, Record};
use super::gamification::{credit_xp, focus_xp};
use crate::domain::{ActiveFocus, AppState, FocusSession};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Apply `action` to `state`, stamping any new timestamps with the current time
pub fn apply(state: &AppState, action: Action) -> AppState {
    apply_at(state, action, Utc::now())
}

/// Apply `action` to `state` as of `now`.
///
/// Never mutates `state`. Actions naming ids that do not exist, and action
/// kinds that are not recognised, return an unchanged copy.
pub fn apply_at(state: &AppState, action: Action, now: DateTime<Utc>) -> AppState {
    match action {
        Action::LoadState(snapshot) => snapshot.merge_over(AppState::seeded(now)),

        Action::AddNote(note) => {
            let mut user_stats = state.user_stats.clone();
            user_stats.total_notes = user_stats.total_notes.saturating_add(1);
            AppState {
                notes: appended(&state.notes, note),
                user_stats,
                ..state.clone()
            }
        }
        Action::UpdateNote(note) => match replaced(&state.notes, note) {
            Some(notes) => AppState {
                notes,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteNote(id) => AppState {
            notes: without(&state.notes, &id),
            ..state.clone()
        },

        Action::AddTask(task) => AppState {
            tasks: appended(&state.tasks, task),
            ..state.clone()
        },
        Action::UpdateTask(task) => match replaced(&state.tasks, task) {
            Some(tasks) => AppState {
                tasks,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteTask(id) => AppState {
            tasks: without(&state.tasks, &id),
            ..state.clone()
        },
        Action::CompleteTask(id) => complete_task(state, &id, now),

        Action::UpdateMission(mission) => match replaced(&state.missions, mission) {
            Some(missions) => AppState {
                missions,
                ..state.clone()
            },
            None => state.clone(),
        },

        Action::StartFocusSession(request) => AppState {
            current_focus_session: Some(ActiveFocus {
                start_time: now,
                duration: request.duration,
                kind: request.kind,
            }),
            ..state.clone()
        },
        Action::EndFocusSession => end_focus_session(state, now),

        Action::AddXp(amount) => AppState {
            user_stats: credit_xp(&state.user_stats, amount),
            ..state.clone()
        },
        Action::ToggleTheme => AppState {
            theme: state.theme.toggled(),
            ..state.clone()
        },

        Action::AddArea(area) => AppState {
            areas: appended(&state.areas, area),
            ..state.clone()
        },
        Action::UpdateArea(area) => match replaced(&state.areas, area) {
            Some(areas) => AppState {
                areas,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteArea(id) => {
            let (areas, themes) = cascade_delete(&state.areas, &state.themes, &id);
            AppState {
                areas,
                themes,
                ..state.clone()
            }
        }

        Action::AddTheme(theme) => AppState {
            themes: appended(&state.themes, theme),
            ..state.clone()
        },
        Action::UpdateTheme(theme) => match replaced(&state.themes, theme) {
            Some(themes) => AppState {
                themes,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteTheme(id) => {
            let (themes, goals) = cascade_delete(&state.themes, &state.goals, &id);
            AppState {
                themes,
                goals,
                ..state.clone()
            }
        }

        Action::AddGoal(goal) => AppState {
            goals: appended(&state.goals, goal),
            ..state.clone()
        },
        Action::UpdateGoal(goal) => match replaced(&state.goals, goal) {
            Some(goals) => AppState {
                goals,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteGoal(id) => {
            let (goals, projects) = cascade_delete(&state.goals, &state.projects, &id);
            AppState {
                goals,
                projects,
                ..state.clone()
            }
        }

        Action::AddProject(project) => AppState {
            projects: appended(&state.projects, project),
            ..state.clone()
        },
        Action::UpdateProject(project) => match replaced(&state.projects, project) {
            Some(projects) => AppState {
                projects,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteProject(id) => {
            let (projects, subprojects) = cascade_delete(&state.projects, &state.subprojects, &id);
            AppState {
                projects,
                subprojects,
                ..state.clone()
            }
        }

        Action::AddSubproject(subproject) => AppState {
            subprojects: appended(&state.subprojects, subproject),
            ..state.clone()
        },
        Action::UpdateSubproject(subproject) => match replaced(&state.subprojects, subproject) {
            Some(subprojects) => AppState {
                subprojects,
                ..state.clone()
            },
            None => state.clone(),
        },
        Action::DeleteSubproject(id) => AppState {
            subprojects: without(&state.subprojects, &id),
            ..state.clone()
        },

        Action::Unknown => state.clone(),
    }
}

/// Mark a task done and credit its reward; completing twice credits once
fn complete_task(state: &AppState, id: &str, now: DateTime<Utc>) -> AppState {
    let Some(task) = state.tasks.iter().find(|t| t.id() == id) else {
        return state.clone();
    };
    if task.completed {
        return state.clone();
    }

    let reward = task.xp_reward;
    let tasks = state
        .tasks
        .iter()
        .map(|t| {
            if t.id == id {
                let mut done = t.clone();
                done.completed = true;
                done.completed_at = Some(now);
                done
            } else {
                t.clone()
            }
        })
        .collect();

    let mut user_stats = credit_xp(&state.user_stats, reward);
    user_stats.total_tasks = user_stats.total_tasks.saturating_add(1);

    AppState {
        tasks,
        user_stats,
        ..state.clone()
    }
}

/// Commit the in-progress focus session to history and credit it
fn end_focus_session(state: &AppState, now: DateTime<Utc>) -> AppState {
    let Some(active) = &state.current_focus_session else {
        return state.clone();
    };

    let session = FocusSession {
        id: Uuid::new_v4().to_string(),
        duration: active.duration,
        kind: active.kind,
        tags: Vec::new(),
        start_time: active.start_time,
        end_time: now,
        xp_earned: focus_xp(active.duration),
    };

    let mut user_stats = credit_xp(&state.user_stats, session.xp_earned);
    user_stats.total_focus_time = user_stats.total_focus_time.saturating_add(session.duration);

    AppState {
        focus_sessions: appended(&state.focus_sessions, session),
        current_focus_session: None,
        user_stats,
        ..state.clone()
    }
}
