//! Snapshot persistence and date input parsing.
//!
//! The whole collection is stored as one pretty-printed JSON document holding
//! every task and the id counter. Writes go through a temp file and a rename
//! so a crash mid-save never leaves a truncated data file behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};

use crate::collection::{Snapshot, TaskCollection};
use crate::error::{Error, Result};
use crate::task::today;

/// Load the collection stored at `path`. A missing file yields an empty
/// collection with the counter at 1.
pub fn load(path: &Path) -> Result<TaskCollection> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no existing task file, starting fresh");
        return Ok(TaskCollection::new());
    }
    let buf = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&buf)?;
    let collection = TaskCollection::from_snapshot(snapshot)?;
    tracing::info!(path = %path.display(), count = collection.len(), "loaded tasks");
    Ok(collection)
}

/// Save the collection to `path` using atomic write (temp file + rename).
pub fn save(collection: &TaskCollection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(&collection.snapshot())?;
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(&tmp, path)?;
    tracing::info!(path = %path.display(), count = collection.len(), "saved tasks");
    Ok(())
}

/// Parse a due date typed by the user.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday" .. "sunday" (and "next monday", short forms "mon" ..)
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str) -> Result<NaiveDate> {
    parse_due_input_from(s, today())
}

pub fn parse_due_input_from(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim().to_lowercase();
    let invalid = || {
        Error::validation(format!(
            "invalid date '{s}'. Please use yyyy-mm-dd, 'today', 'tomorrow' or 'in Nd'"
        ))
    };

    match s.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Ok(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
            return Ok(first_of_next - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_days(n)
                .and_then(|d| today.checked_add_signed(d))
                .ok_or_else(invalid);
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_weeks(n)
                .and_then(|d| today.checked_add_signed(d))
                .ok_or_else(invalid);
        }
        return Err(invalid());
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (day_name, target) in weekdays {
        let days_ahead = (target + 7 - current) % 7;
        if s == day_name || s == format!("this {day_name}") {
            return Ok(today + Duration::days(days_ahead));
        }
        if s == format!("next {day_name}") {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Ok(today + Duration::days(days_to_add));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| invalid())
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    let end = start + Duration::days(6);
    (start, end)
}
