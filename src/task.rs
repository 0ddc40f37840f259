//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single work item
//! with its scheduling, classification and tag metadata. A task guards its own
//! invariants: every mutation refreshes the modification timestamp, tags are
//! stored normalised, and completion is tracked by a single optional timestamp
//! so "completed" and "completed at" can never disagree.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{Category, Priority};

/// A single unit of work with scheduling and classification metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: u64,
    title: String,
    description: String,
    due_date: NaiveDate,
    priority: Priority,
    category: Category,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    estimated_hours: u32,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

/// Normalise a tag by trimming surrounding whitespace and lowercasing.
pub fn normalise_tag(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Task {
    /// Build a new pending task. Fails if the title is blank.
    ///
    /// Identity is assigned by the owning collection; see
    /// [`TaskCollection::create`](crate::collection::TaskCollection::create).
    pub fn new(
        id: u64,
        title: &str,
        description: &str,
        due_date: NaiveDate,
        priority: Priority,
        category: Category,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::validation("title cannot be empty"));
        }
        let now = Utc::now();
        Ok(Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            priority,
            category,
            tags: Vec::new(),
            estimated_hours: 0,
            created_at: now,
            last_modified_at: now,
            completed_at: None,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Tags in the order they were added.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn estimated_hours(&self) -> u32 {
        self.estimated_hours
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    // Updates are deliberately unvalidated: an empty title is accepted here
    // even though `new` rejects one.

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn set_due_date(&mut self, due_date: NaiveDate) {
        self.due_date = due_date;
        self.touch();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.touch();
    }

    /// Store the estimate, clamping negative input to zero.
    pub fn set_estimated_hours(&mut self, hours: i64) {
        self.estimated_hours = hours.clamp(0, i64::from(u32::MAX)) as u32;
        self.touch();
    }

    /// Mark the task done. Calling this on a completed task refreshes the
    /// completion time.
    pub fn mark_complete(&mut self) {
        self.touch();
        self.completed_at = Some(self.last_modified_at);
    }

    pub fn mark_incomplete(&mut self) {
        self.completed_at = None;
        self.touch();
    }

    /// Add a tag. Returns `false` when the normalised tag is empty or already
    /// present, in which case nothing (including the timestamp) changes.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = normalise_tag(tag);
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        self.touch();
        true
    }

    /// Remove a tag. Removing an absent tag is a no-op and leaves the
    /// modification time untouched.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = normalise_tag(tag);
        let Some(pos) = self.tags.iter().position(|t| *t == tag) else {
            return false;
        };
        self.tags.remove(pos);
        self.touch();
        true
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = normalise_tag(tag);
        self.tags.contains(&tag)
    }

    /// Pending and due strictly before today.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date < today
    }

    /// Signed number of days from today until the due date.
    pub fn days_until_due(&self) -> i64 {
        self.days_until_due_from(today())
    }

    pub fn days_until_due_from(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Timestamps never move backwards, even if the wall clock does.
    fn touch(&mut self) {
        self.last_modified_at = Utc::now().max(self.last_modified_at);
    }
}
