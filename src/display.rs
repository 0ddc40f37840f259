//! Plain-text rendering of tasks, tables and statistics.

use std::fmt::Write;

use chrono::{Local, NaiveDate};

use crate::stats::TaskStatistics;
use crate::task::Task;

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

/// Status word shown next to a task.
pub fn status_label(task: &Task, today: NaiveDate) -> &'static str {
    if task.is_completed() {
        "Completed"
    } else if task.is_overdue_on(today) {
        "OVERDUE"
    } else {
        "Pending"
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

const TITLE_WIDTH: usize = 48;

/// Render tasks as a fixed-width table, one row per task.
pub fn render_table(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<8} {:<10} {:<10} {:<12} {}",
        "ID", "Pri", "Category", "Status", "Due", "Title [tags]"
    );
    for t in tasks {
        let tags = if t.tags().is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags().join(","))
        };
        let _ = writeln!(
            out,
            "{:<5} {:<8} {:<10} {:<10} {:<12} {}{}",
            t.id(),
            t.priority(),
            t.category(),
            status_label(t, today),
            format_due_relative(t.due_date(), today),
            truncate(t.title(), TITLE_WIDTH),
            tags
        );
    }
    out
}

/// Multi-line description of a single task.
pub fn render_task(task: &Task, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {} ({})", task.id(), task.title(), task.priority());
    let _ = writeln!(out, "   Description: {}", task.description());
    let _ = writeln!(
        out,
        "   Due: {} | Category: {} | Status: {}",
        task.due_date().format("%Y-%m-%d"),
        task.category(),
        status_label(task, today)
    );
    if !task.tags().is_empty() {
        let _ = writeln!(out, "   Tags: {}", task.tags().join(", "));
    }
    if task.estimated_hours() > 0 {
        let _ = writeln!(out, "   Estimated: {} hours", task.estimated_hours());
    }
    match task.completed_at() {
        Some(done) => {
            let done = done.with_timezone(&Local);
            let _ = writeln!(
                out,
                "   Completed on: {} at {}",
                done.format("%Y-%m-%d"),
                done.format("%H:%M")
            );
        }
        None => {
            let days = task.days_until_due_from(today);
            if days >= 0 {
                let _ = writeln!(out, "   Days until due: {days}");
            }
        }
    }
    let _ = write!(
        out,
        "   Created: {} | Modified: {}",
        task.created_at().with_timezone(&Local).format("%b %d, %Y %H:%M"),
        task.last_modified_at().with_timezone(&Local).format("%b %d, %Y %H:%M")
    );
    out
}

/// Statistics report as shown by `tm stats` and the menu.
pub fn render_stats(stats: &TaskStatistics<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "TASK STATISTICS");
    let _ = writeln!(out, "======================");
    let _ = writeln!(out, "Total Tasks: {}", stats.total());
    let _ = writeln!(
        out,
        "Completed: {} ({:.1}%)",
        stats.completed(),
        stats.completion_rate()
    );
    let _ = writeln!(out, "Pending: {}", stats.pending());
    let _ = writeln!(out, "Overdue: {}", stats.overdue());

    let _ = writeln!(out, "\nBy Category:");
    for (cat, count) in stats.by_category() {
        let _ = writeln!(out, "  {cat}: {count}");
    }
    let _ = writeln!(out, "\nBy Priority:");
    for (pri, count) in stats.by_priority() {
        let _ = writeln!(out, "  {pri}: {count}");
    }
    if let Some(urgent) = stats.most_urgent() {
        let _ = writeln!(
            out,
            "\nMost Urgent Task: {} (Due: {})",
            urgent.title(),
            urgent.due_date()
        );
    }
    out
}
