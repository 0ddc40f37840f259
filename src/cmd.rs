//! Command implementations for the CLI interface.
//!
//! Each subcommand loads nothing itself: it receives the collection loaded by
//! `main`, performs one action, and saves when it changed something.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::collection::TaskCollection;
use crate::db::{self, parse_due_input};
use crate::display::{render_stats, render_table, render_task};
use crate::error::{Error, Result};
use crate::export::{export_to_file, ExportFormat};
use crate::fields::{Category, Priority, SortKey, Status};
use crate::query::{self, Filter};
use crate::stats::TaskStatistics;
use crate::task::today;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday" or "in Nd".
        #[arg(long)]
        due: String,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum, ignore_case = true, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category: work | personal | study | shopping | health | finance | other.
        #[arg(long, value_enum, ignore_case = true, default_value_t = Category::Other)]
        category: Category,
        /// Tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Estimated effort in hours.
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,
    },

    /// Update fields on a task.
    Update {
        /// Task ID to update
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum, ignore_case = true)]
        priority: Option<Priority>,
        #[arg(long, value_enum, ignore_case = true)]
        category: Option<Category>,
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,
    },

    /// Delete a task by ID.
    Delete {
        /// Task ID to delete
        id: u64,
    },

    /// Mark a task complete.
    Complete {
        /// Task ID to complete
        id: u64,
    },

    /// Mark a task incomplete again.
    Reopen {
        /// Task ID to reopen
        id: u64,
    },

    /// List tasks in insertion order.
    List {
        /// Only show tasks that are not completed.
        #[arg(long)]
        pending: bool,
    },

    /// Show every detail of a single task.
    View {
        /// Task ID to view
        id: u64,
    },

    /// Find tasks whose title, description or tags contain a keyword.
    Search {
        keyword: String,
    },

    /// Filter tasks: category <name> | priority <name> | status <completed|pending> | overdue | tag <tag>.
    Filter {
        /// Criterion kind.
        kind: String,
        /// Criterion value (not needed for `overdue`).
        #[arg(default_value = "")]
        value: String,
    },

    /// Show all tasks in a chosen order.
    Sort {
        #[arg(value_enum)]
        key: SortKey,
    },

    /// Add or remove tags.
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Show aggregate statistics.
    Stats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show pending tasks due within the next N days.
    Upcoming {
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },

    /// Export every task to a file.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        /// Output file path (default: tasks_export.txt or tasks.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Open the numbered interactive menu.
    Menu,

    /// Launch the full-screen task board.
    Ui,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TagAction {
    /// Add tags to a task.
    Add {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from a task.
    Remove {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

/// Add a new task to the collection.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    tasks: &mut TaskCollection,
    db_path: &Path,
    title: String,
    desc: String,
    due: String,
    priority: Priority,
    category: Category,
    tags: Vec<String>,
    hours: Option<i64>,
) -> Result<()> {
    let due = parse_due_input(&due)?;
    let task = tasks.create(&title, desc.trim(), due, priority, category)?;
    for tag in &tags {
        task.add_tag(tag);
    }
    if let Some(h) = hours.filter(|h| *h > 0) {
        task.set_estimated_hours(h);
    }
    let id = task.id();
    if due < today() {
        println!("Warning: due date is in the past.");
    }
    db::save(tasks, db_path)?;
    println!("Added task {id}");
    Ok(())
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    tasks: &mut TaskCollection,
    db_path: &Path,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    priority: Option<Priority>,
    category: Option<Category>,
    hours: Option<i64>,
) -> Result<()> {
    let due = due.as_deref().map(parse_due_input).transpose()?;
    let t = tasks.get_mut(id)?;
    if let Some(s) = title { t.set_title(s); }
    if let Some(d) = desc { t.set_description(d); }
    if let Some(d) = due { t.set_due_date(d); }
    if let Some(p) = priority { t.set_priority(p); }
    if let Some(c) = category { t.set_category(c); }
    if let Some(h) = hours { t.set_estimated_hours(h); }
    db::save(tasks, db_path)?;
    println!("Updated task {id}");
    Ok(())
}

pub fn cmd_delete(tasks: &mut TaskCollection, db_path: &Path, id: u64) -> Result<()> {
    if !tasks.remove(id) {
        return Err(Error::NotFound(id));
    }
    db::save(tasks, db_path)?;
    println!("Deleted task {id}");
    Ok(())
}

pub fn cmd_complete(tasks: &mut TaskCollection, db_path: &Path, id: u64) -> Result<()> {
    tasks.get_mut(id)?.mark_complete();
    db::save(tasks, db_path)?;
    println!("Task {id} marked as complete.");
    Ok(())
}

pub fn cmd_reopen(tasks: &mut TaskCollection, db_path: &Path, id: u64) -> Result<()> {
    tasks.get_mut(id)?.mark_incomplete();
    db::save(tasks, db_path)?;
    println!("Task {id} marked as incomplete.");
    Ok(())
}

/// List tasks, optionally hiding completed ones.
pub fn cmd_list(tasks: &TaskCollection, pending: bool) -> Result<()> {
    let shown = if pending {
        query::filter_by_status(tasks.all(), Status::Pending)
    } else {
        tasks.all().collect()
    };
    if shown.is_empty() {
        println!("{}", if pending { "No pending tasks!" } else { "No tasks available." });
        return Ok(());
    }
    print!("{}", render_table(&shown, today()));
    println!("\nTotal: {} tasks", shown.len());
    Ok(())
}

pub fn cmd_view(tasks: &TaskCollection, id: u64) -> Result<()> {
    println!("{}", render_task(tasks.get(id)?, today()));
    Ok(())
}

pub fn cmd_search(tasks: &TaskCollection, keyword: &str) -> Result<()> {
    let results = query::search(tasks.all(), keyword);
    if results.is_empty() {
        println!("No tasks found matching: {}", keyword.to_lowercase());
        return Ok(());
    }
    print!("{}", render_table(&results, today()));
    println!("\nFound: {} tasks", results.len());
    Ok(())
}

pub fn cmd_filter(tasks: &TaskCollection, kind: &str, value: &str) -> Result<()> {
    let criterion = Filter::parse(kind, value)?;
    let results = query::filter(tasks.all(), &criterion);
    if results.is_empty() {
        println!("No tasks match the filter.");
        return Ok(());
    }
    print!("{}", render_table(&results, today()));
    println!("\nFound: {} tasks", results.len());
    Ok(())
}

pub fn cmd_sort(tasks: &TaskCollection, key: SortKey) -> Result<()> {
    let sorted = query::sort(tasks.all(), key);
    println!("Sorted by {}:", key.label());
    print!("{}", render_table(&sorted, today()));
    Ok(())
}

pub fn cmd_tag(tasks: &mut TaskCollection, db_path: &Path, action: TagAction) -> Result<()> {
    let (id, changed) = match action {
        TagAction::Add { id, tags: new } => {
            let t = tasks.get_mut(id)?;
            (id, new.iter().filter(|tag| t.add_tag(tag)).count())
        }
        TagAction::Remove { id, tags: old } => {
            let t = tasks.get_mut(id)?;
            (id, old.iter().filter(|tag| t.remove_tag(tag)).count())
        }
    };
    if changed > 0 {
        db::save(tasks, db_path)?;
    }
    let t = tasks.get(id)?;
    println!("Updated tags: [{}]", t.tags().join(", "));
    Ok(())
}

pub fn cmd_stats(tasks: &TaskCollection, json: bool) -> Result<()> {
    let stats = TaskStatistics::new(tasks);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats.summary())?);
    } else {
        print!("{}", render_stats(&stats));
    }
    Ok(())
}

pub fn cmd_upcoming(tasks: &TaskCollection, days: i64) -> Result<()> {
    let upcoming = query::upcoming(tasks.all(), days)?;
    if upcoming.is_empty() {
        println!("No tasks due in the next {days} days.");
        return Ok(());
    }
    println!("UPCOMING TASKS (Next {days} days)");
    print!("{}", render_table(&upcoming, today()));
    println!("\nTotal upcoming: {} tasks", upcoming.len());
    Ok(())
}

pub fn cmd_export(
    tasks: &TaskCollection,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(format.default_file()));
    let all: Vec<_> = tasks.all().collect();
    export_to_file(&all, format, &path, today())?;
    println!("Exported {} task(s) to {}", all.len(), path.display());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
