//! Aggregate statistics over a task collection.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::collection::TaskCollection;
use crate::fields::{Category, Priority};
use crate::task::{today, Task};

/// Read-only statistics view over a set of tasks.
pub struct TaskStatistics<'a> {
    tasks: Vec<&'a Task>,
    today: NaiveDate,
}

/// Serialisable summary of every statistic, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completion_rate: f64,
    pub by_category: BTreeMap<Category, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub most_urgent: Option<UrgentTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrgentTask {
    pub id: u64,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
}

impl<'a> TaskStatistics<'a> {
    pub fn new(collection: &'a TaskCollection) -> Self {
        Self::from_tasks(collection.all(), today())
    }

    /// Statistics over an arbitrary task sequence, judging overdue against
    /// `today`.
    pub fn from_tasks<I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        TaskStatistics {
            tasks: tasks.into_iter().collect(),
            today,
        }
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed()).count()
    }

    pub fn pending(&self) -> usize {
        self.total() - self.completed()
    }

    pub fn overdue(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.is_overdue_on(self.today))
            .count()
    }

    /// Percentage of completed tasks, unrounded. Zero for an empty set.
    pub fn completion_rate(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.completed() as f64 / self.total() as f64 * 100.0
    }

    /// Counts for the categories that occur; absent categories are omitted.
    pub fn by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for t in &self.tasks {
            *counts.entry(t.category()).or_default() += 1;
        }
        counts
    }

    pub fn by_priority(&self) -> BTreeMap<Priority, usize> {
        let mut counts = BTreeMap::new();
        for t in &self.tasks {
            *counts.entry(t.priority()).or_default() += 1;
        }
        counts
    }

    /// The pending task with the earliest due date, ties going to the higher
    /// priority and then to the earlier insertion.
    pub fn most_urgent(&self) -> Option<&'a Task> {
        self.tasks
            .iter()
            .copied()
            .filter(|t| !t.is_completed())
            .min_by(|a, b| urgency_order(a, b))
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total: self.total(),
            completed: self.completed(),
            pending: self.pending(),
            overdue: self.overdue(),
            completion_rate: self.completion_rate(),
            by_category: self.by_category(),
            by_priority: self.by_priority(),
            most_urgent: self.most_urgent().map(|t| UrgentTask {
                id: t.id(),
                title: t.title().to_string(),
                due_date: t.due_date(),
                priority: t.priority(),
            }),
        }
    }
}

fn urgency_order(a: &Task, b: &Task) -> Ordering {
    (a.due_date(), Reverse(a.priority())).cmp(&(b.due_date(), Reverse(b.priority())))
}
