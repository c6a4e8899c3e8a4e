use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lifemaster::app::{App, NewEntry, NewTask, ProjectBrief};
use lifemaster::domain::views::{focus_minutes_on, level_progress, unlocked_badge_count};
use lifemaster::domain::{
    dashboard, flatten_hierarchy, task_summary, tree_connector, FocusKind, Priority,
};
use lifemaster::engine::Action;
use lifemaster::persistence::{get_data_dir, init_local_data_dir, FileStore};
use lifemaster::report::write_report;
use lifemaster::ticker::{tick_duration, FocusTimer, TimerEvent};
use std::io::Write;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lifemaster")]
#[command(about = "Notes, tasks, focus sessions and life planning with levels and badges", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .lifemaster, then ~/.lifemaster
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .lifemaster directory in the current directory
    Init,
    /// Show level, XP, badges and today's numbers
    Status,
    /// Apply a raw action, e.g. '{"type":"ADD_XP","payload":50}'
    Dispatch { json: String },
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Note(NoteCommand),
    #[command(subcommand)]
    Focus(FocusCommand),
    /// Add a life area
    Area {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "#3B82F6")]
        color: String,
        #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    /// Add a theme under an area
    Theme {
        area_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    /// Add a goal under a theme
    Goal {
        theme_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    /// Add a project under a goal
    Project {
        goal_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        summary: String,
        #[arg(long, default_value = "")]
        context: String,
        /// Repeatable
        #[arg(long = "deliverable")]
        deliverables: Vec<String>,
        #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    /// Add a subproject under a project
    Subproject {
        project_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    /// Delete a record by id
    Delete { kind: RecordKind, id: String },
    /// Print the area / theme / goal / project tree
    Tree,
    /// Switch between light and dark mode
    ToggleTheme,
    /// Write a Markdown progress report
    Report {
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        title: String,
        #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        project: Option<String>,
    },
    /// Mark a task completed and collect its XP
    Done { id: String },
    Delete { id: String },
    List,
}

#[derive(Subcommand)]
enum NoteCommand {
    Add {
        title: String,
        #[arg(default_value = "")]
        content: String,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    Delete { id: String },
    List,
}

#[derive(Subcommand)]
enum FocusCommand {
    /// Start a focus session without a countdown
    Start {
        #[arg(default_value_t = 25)]
        minutes: u32,
        #[arg(short, long, value_parser = parse_focus_kind, default_value = "pomodoro")]
        kind: FocusKind,
    },
    /// End the running focus session and collect its XP
    End,
    /// Start a session and count it down in the terminal
    Run {
        #[arg(default_value_t = 25)]
        minutes: u32,
        #[arg(short, long, value_parser = parse_focus_kind, default_value = "pomodoro")]
        kind: FocusKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    Note,
    Task,
    Area,
    Theme,
    Goal,
    Project,
    Subproject,
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    Priority::from_tag(s).ok_or_else(|| format!("unknown priority '{}' (low, medium, high)", s))
}

fn parse_focus_kind(s: &str) -> std::result::Result<FocusKind, String> {
    FocusKind::from_tag(s)
        .ok_or_else(|| format!("unknown focus type '{}' (pomodoro, deep-work, meditation)", s))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&current_dir)?;
        println!("Initialized lifemaster directory: {}", data_dir.display());
        println!();
        println!("lifemaster will now keep its state in this local directory.");
        return Ok(());
    }

    let data_dir = match cli.dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    tracing::debug!(dir = %data_dir.display(), "using data directory");
    let mut app = App::open(FileStore::new(data_dir));

    match cli.command {
        // Handled before the store is opened
        Commands::Init => {}
        Commands::Status => print_status(&app),
        Commands::Dispatch { json } => {
            let action: Action = serde_json::from_str(&json).context("Invalid action JSON")?;
            if action == Action::Unknown {
                tracing::warn!("unrecognised action type, state left unchanged");
            }
            let kind = action.kind();
            if app.dispatch(action) {
                println!("{}: applied", kind);
            } else {
                println!("{}: no change", kind);
            }
        }
        Commands::Task(command) => run_task(&mut app, command)?,
        Commands::Note(command) => run_note(&mut app, command)?,
        Commands::Focus(command) => run_focus(&mut app, command)?,
        Commands::Area {
            title,
            description,
            color,
            priority,
        } => {
            let entry = NewEntry::titled(title).description(description).priority(priority);
            let id = app.add_area(entry, &color)?;
            println!("Added area {}", id);
        }
        Commands::Theme {
            area_id,
            title,
            description,
            priority,
        } => {
            let entry = NewEntry::titled(title).description(description).priority(priority);
            let id = app.add_theme(&area_id, entry)?;
            println!("Added theme {}", id);
        }
        Commands::Goal {
            theme_id,
            title,
            description,
            priority,
        } => {
            let entry = NewEntry::titled(title).description(description).priority(priority);
            let id = app.add_goal(&theme_id, entry)?;
            println!("Added goal {}", id);
        }
        Commands::Project {
            goal_id,
            title,
            description,
            summary,
            context,
            deliverables,
            priority,
        } => {
            let entry = NewEntry::titled(title).description(description).priority(priority);
            let brief = ProjectBrief {
                summary,
                context,
                deliverables,
            };
            let id = app.add_project(&goal_id, entry, brief)?;
            println!("Added project {}", id);
        }
        Commands::Subproject {
            project_id,
            title,
            description,
            priority,
        } => {
            let entry = NewEntry::titled(title).description(description).priority(priority);
            let id = app.add_subproject(&project_id, entry)?;
            println!("Added subproject {}", id);
        }
        Commands::Delete { kind, id } => {
            let action = match kind {
                RecordKind::Note => Action::DeleteNote(id.clone()),
                RecordKind::Task => Action::DeleteTask(id.clone()),
                RecordKind::Area => Action::DeleteArea(id.clone()),
                RecordKind::Theme => Action::DeleteTheme(id.clone()),
                RecordKind::Goal => Action::DeleteGoal(id.clone()),
                RecordKind::Project => Action::DeleteProject(id.clone()),
                RecordKind::Subproject => Action::DeleteSubproject(id.clone()),
            };
            if app.dispatch(action) {
                println!("Deleted {}", id);
            } else {
                println!("Nothing to delete: {}", id);
            }
        }
        Commands::Tree => print_tree(&app),
        Commands::ToggleTheme => {
            app.toggle_theme();
            println!("Theme: {:?}", app.state().theme);
        }
        Commands::Report { output } => {
            let report_path = write_report(app.state(), app.store().dir(), output)?;
            println!("Report generated: {}", report_path.display());
        }
    }

    Ok(())
}

fn run_task(app: &mut App<FileStore>, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            priority,
            description,
            tags,
            project,
        } => {
            let id = app.add_task(NewTask {
                title,
                description,
                priority,
                tags,
                project_id: project,
                subproject_id: None,
            })?;
            println!("Added task {} (+{} XP)", id, priority.xp_reward());
        }
        TaskCommand::Done { id } => {
            let before = app.state().user_stats.total_xp;
            if app.complete_task(&id) {
                let gained = app.state().user_stats.total_xp - before;
                println!("Completed {} (+{} XP)", id, gained);
            } else {
                println!("No open task with id {}", id);
            }
        }
        TaskCommand::Delete { id } => {
            if app.dispatch(Action::DeleteTask(id.clone())) {
                println!("Deleted {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        TaskCommand::List => {
            let summary = task_summary(app.state());
            println!(
                "{} pending, {} completed, {} XP earned",
                summary.pending, summary.completed, summary.xp_earned
            );
            for task in &app.state().tasks {
                let mark = if task.completed { "x" } else { " " };
                println!(
                    "[{}] {}  {} ({}, {} XP)",
                    mark,
                    task.id,
                    task.title,
                    task.priority.to_tag(),
                    task.xp_reward
                );
            }
        }
    }
    Ok(())
}

fn run_note(app: &mut App<FileStore>, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add {
            title,
            content,
            tags,
        } => {
            let id = app.add_note(&title, &content, tags)?;
            println!("Added note {}", id);
        }
        NoteCommand::Delete { id } => {
            if app.dispatch(Action::DeleteNote(id.clone())) {
                println!("Deleted {}", id);
            } else {
                println!("No note with id {}", id);
            }
        }
        NoteCommand::List => {
            for note in &app.state().notes {
                let tags = if note.tags.is_empty() {
                    String::new()
                } else {
                    format!("  #{}", note.tags.join(" #"))
                };
                println!("{}  {}{}", note.id, note.title, tags);
            }
        }
    }
    Ok(())
}

fn run_focus(app: &mut App<FileStore>, command: FocusCommand) -> Result<()> {
    match command {
        FocusCommand::Start { minutes, kind } => {
            app.start_focus(minutes, kind)?;
            println!("Focus started: {} min {}", minutes, kind.to_tag());
        }
        FocusCommand::End => finish_focus(app),
        FocusCommand::Run { minutes, kind } => {
            app.start_focus(minutes, kind)?;
            let mut timer = FocusTimer::new();
            timer.start(minutes);

            let mut stdout = std::io::stdout();
            loop {
                print!("\r{} {:>5.1}% ", timer.display(), timer.progress());
                stdout.flush().context("Failed to write to terminal")?;
                std::thread::sleep(tick_duration());
                if timer.tick() == TimerEvent::Finished {
                    break;
                }
            }
            println!();
            finish_focus(app);
        }
    }
    Ok(())
}

fn finish_focus(app: &mut App<FileStore>) {
    match app.end_focus() {
        Some(session) => println!(
            "Focus complete: {} min {} (+{} XP)",
            session.duration,
            session.kind.to_tag(),
            session.xp_earned
        ),
        None => println!("No focus session running"),
    }
}

fn print_status(app: &App<FileStore>) {
    let state = app.state();
    let stats = &state.user_stats;
    let overview = dashboard(state);
    let today = chrono::Local::now().date_naive();

    println!(
        "Level {}  {} XP  ({:.0}% to next, {} XP left)",
        stats.level,
        stats.xp,
        level_progress(stats) * 100.0,
        stats.xp_to_next_level
    );
    println!(
        "Streak {} days  Badges {}  Focus today {} min  Focus total {}h",
        stats.streak,
        unlocked_badge_count(stats),
        focus_minutes_on(state, today, &chrono::Local),
        overview.focus_hours
    );
    println!(
        "{} notes  {} open tasks  {} areas  {} projects  {}/{} goals done",
        overview.note_count,
        task_summary(state).pending,
        overview.total_areas,
        overview.total_projects,
        overview.completed_goals,
        overview.total_goals
    );
    if let Some(active) = &state.current_focus_session {
        println!(
            "Focus running: {} min {} since {}",
            active.duration,
            active.kind.to_tag(),
            active.start_time.with_timezone(&chrono::Local).format("%H:%M")
        );
    }
}

fn print_tree(app: &App<FileStore>) {
    for row in flatten_hierarchy(app.state()) {
        let indent = "  ".repeat(row.depth.saturating_sub(1));
        let connector = if row.depth == 0 {
            ""
        } else {
            tree_connector(row.is_last)
        };
        println!("{}{}{:?} {}  [{}]", indent, connector, row.kind, row.title, row.id);
    }
}
