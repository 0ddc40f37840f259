//! Text and CSV export of tasks.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

use crate::display::{render_task, status_label};
use crate::error::Result;
use crate::task::Task;

/// Output format for `tm export`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
}

impl ExportFormat {
    pub fn default_file(self) -> &'static str {
        match self {
            ExportFormat::Text => "tasks_export.txt",
            ExportFormat::Csv => "tasks.csv",
        }
    }
}

/// Human-readable report: a header, one card per task, and a total.
pub fn to_text(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "TASK EXPORT - {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{}", "=".repeat(50));
    for task in tasks {
        let _ = writeln!(out, "{}", render_task(task, today));
        let _ = writeln!(out, "{}", "-".repeat(50));
    }
    let _ = writeln!(out, "\nTotal tasks exported: {}", tasks.len());
    out
}

/// One CSV row per task with a header line.
pub fn to_csv(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = String::from(
        "ID,Title,Description,Due,Priority,Category,Status,Tags,EstimatedHours,CreatedUTC,ModifiedUTC,CompletedUTC\n",
    );
    for t in tasks {
        let completed = t
            .completed_at()
            .map(|c| c.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            t.id(),
            escape_csv(t.title()),
            escape_csv(t.description()),
            t.due_date(),
            t.priority(),
            t.category(),
            status_label(t, today),
            escape_csv(&t.tags().join(";")),
            t.estimated_hours(),
            t.created_at().to_rfc3339(),
            t.last_modified_at().to_rfc3339(),
            completed
        );
    }
    out
}

/// Quote fields containing separators, quotes or newlines.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render `tasks` in `format` and write them to `path`.
pub fn export_to_file(
    tasks: &[&Task],
    format: ExportFormat,
    path: &Path,
    today: NaiveDate,
) -> Result<()> {
    let contents = match format {
        ExportFormat::Text => to_text(tasks, today),
        ExportFormat::Csv => to_csv(tasks, today),
    };
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), count = tasks.len(), ?format, "exported tasks");
    Ok(())
}
