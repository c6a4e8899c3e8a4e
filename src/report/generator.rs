use crate::domain::views::{
    badge_statuses, dashboard, focus_minutes_on, focus_minutes_since, level_progress,
    mission_progress, task_summary,
};
use crate::domain::{status_badge, AppState};
use crate::engine::gamification::XP_PER_LEVEL;
use crate::persistence::atomic_write;
use anyhow::Result;
use chrono::{DateTime, Duration, Local, Utc};
use std::path::{Path, PathBuf};

/// Format minutes as "Xh Ym" or "Xm" for display
fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        let hours = minutes / 60;
        let mins = minutes % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Render a Markdown progress report of `state` as of `now`
pub fn render_report(state: &AppState, now: DateTime<Utc>) -> String {
    let stats = &state.user_stats;
    let overview = dashboard(state);
    let tasks = task_summary(state);
    let today = now.with_timezone(&Local).date_naive();

    let mut report = String::new();

    report.push_str(&format!("# Progress Report - {}\n\n", today));

    // Level
    report.push_str("## Level\n\n");
    report.push_str(&format!("- **Level:** {}\n", stats.level));
    report.push_str(&format!(
        "- **XP:** {} / {} ({} of this level)\n",
        stats.xp,
        u64::from(stats.level) * u64::from(XP_PER_LEVEL),
        format_percent(level_progress(stats) * 100.0)
    ));
    report.push_str(&format!("- **XP to Next Level:** {}\n", stats.xp_to_next_level));
    report.push_str(&format!("- **Total XP:** {}\n", stats.total_xp));
    report.push_str(&format!(
        "- **Streak:** {} days (longest {})\n\n",
        stats.streak, stats.longest_streak
    ));

    // Badges
    let badges = badge_statuses(stats);
    let unlocked = badges.iter().filter(|b| b.unlocked).count();
    report.push_str(&format!("## Badges ({}/{})\n\n", unlocked, badges.len()));
    for status in &badges {
        let mark = if status.unlocked { "x" } else { " " };
        report.push_str(&format!(
            "- [{}] **{}**: {}\n",
            mark, status.badge.name, status.badge.description
        ));
    }
    report.push('\n');

    // Missions
    if !state.missions.is_empty() {
        report.push_str("## Missions\n\n");
        for mission in &state.missions {
            let mark = if mission.completed { "x" } else { " " };
            report.push_str(&format!(
                "- [{}] **{}** ({:?}): {}/{} ({}) +{} XP\n",
                mark,
                mission.title,
                mission.kind,
                mission.current,
                mission.target,
                format_percent(mission_progress(mission)),
                mission.xp_reward
            ));
        }
        report.push('\n');
    }

    // Tasks
    report.push_str("## Tasks\n\n");
    report.push_str(&format!(
        "- **Pending:** {} | **Completed:** {} | **XP Earned:** {}\n",
        tasks.pending, tasks.completed, tasks.xp_earned
    ));
    for task in &overview.incomplete_tasks {
        report.push_str(&format!(
            "- [ ] **{}** ({}, +{} XP)\n",
            task.title,
            task.priority.to_tag(),
            task.xp_reward
        ));
    }
    report.push('\n');

    // Focus
    report.push_str("## Focus\n\n");
    report.push_str(&format!(
        "- **Today:** {}\n",
        format_minutes(focus_minutes_on(state, today, &Local))
    ));
    report.push_str(&format!(
        "- **Last 7 Days:** {}\n",
        format_minutes(focus_minutes_since(state, now - Duration::days(7)))
    ));
    report.push_str(&format!(
        "- **All Time:** {} over {} sessions\n",
        format_minutes(stats.total_focus_time),
        state.focus_sessions.len()
    ));
    if let Some(active) = &state.current_focus_session {
        report.push_str(&format!(
            "- **In Progress:** {} {} since {}\n",
            format_minutes(active.duration),
            active.kind.to_tag(),
            active.start_time.with_timezone(&Local).format("%H:%M")
        ));
    }
    report.push('\n');

    // Knowledge hub
    report.push_str("## Knowledge Hub\n\n");
    report.push_str(&format!("- **Areas:** {}\n", overview.total_areas));
    report.push_str(&format!("- **Projects:** {}\n", overview.total_projects));
    report.push_str(&format!(
        "- **Goals Completed:** {}/{}\n",
        overview.completed_goals, overview.total_goals
    ));
    report.push_str(&format!("- **Notes:** {}\n", overview.note_count));
    if !overview.recent_notes.is_empty() {
        report.push_str("\n### Recent Notes\n\n");
        for note in overview.recent_notes.iter().rev() {
            report.push_str(&format!(
                "- **{}** ({})\n",
                note.title,
                note.updated_at.with_timezone(&Local).format("%Y-%m-%d")
            ));
        }
    }
    if !overview.active_projects.is_empty() {
        report.push_str("\n### Active Projects\n\n");
        for project in &overview.active_projects {
            let (done, total) = project.milestone_counts();
            report.push_str(&format!(
                "- **{}** {} {}% ({}/{} milestones)\n",
                project.title,
                status_badge(project.status),
                project.progress,
                done,
                total
            ));
        }
    }

    report
}

/// Render the report and write it to `output`, or `<dir>/report-YYYY-MM-DD.md`
pub fn write_report(state: &AppState, dir: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let now = Utc::now();
    let path = match output {
        Some(path) => path,
        None => dir.join(format!(
            "report-{}.md",
            now.with_timezone(&Local).format("%Y-%m-%d")
        )),
    };

    atomic_write(&path, &render_report(state, now))?;
    Ok(path)
}
