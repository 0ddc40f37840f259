//! In-memory task collection.
//!
//! `TaskCollection` owns every task and the id counter. Tasks are kept in
//! insertion order, which is the order "list all" shows; ranking views are
//! produced by [`crate::query`].
//!
//! The collection is meant to be owned by a single actor. It performs no
//! internal locking, so sharing it between threads requires external
//! synchronisation.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{Category, Priority};
use crate::task::Task;

/// Persisted form of a collection: every task plus the id counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn first_id() -> u64 {
    1
}

/// Ordered mapping from task id to task.
#[derive(Debug, Clone)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskCollection {
    pub fn new() -> Self {
        TaskCollection {
            tasks: Vec::new(),
            next_id: first_id(),
        }
    }

    /// The id the next created task will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Create a task with the next id and append it.
    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        due_date: NaiveDate,
        priority: Priority,
        category: Category,
    ) -> Result<&mut Task> {
        let task = Task::new(self.next_id, title, description, due_date, priority, category)?;
        let next_id = id_after(task.id())?;
        tracing::debug!(id = task.id(), title = task.title(), "created task");
        self.next_id = next_id;
        self.tasks.push(task);
        let idx = self.tasks.len() - 1;
        Ok(&mut self.tasks[idx])
    }

    /// Insert an already-built task. Its id must be unused.
    pub fn add(&mut self, task: Task) -> Result<()> {
        if self.position(task.id()).is_some() {
            return Err(Error::validation(format!(
                "task id {} is already in use",
                task.id()
            )));
        }
        self.next_id = self.next_id.max(id_after(task.id())?);
        self.tasks.push(task);
        Ok(())
    }

    /// Remove a task. Returns whether it existed.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.tasks.remove(idx);
                tracing::debug!(id, "removed task");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id() == id)
            .ok_or(Error::NotFound(id))
    }

    pub fn get_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(Error::NotFound(id))
    }

    /// All tasks in insertion order. Call again to restart.
    pub fn all(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Replace the contents with `tasks`, resetting the counter to one past
    /// the largest restored id.
    pub fn restore(&mut self, tasks: Vec<Task>) -> Result<()> {
        let mut seen = HashSet::new();
        for t in &tasks {
            if !seen.insert(t.id()) {
                return Err(Error::validation(format!(
                    "duplicate task id {} in loaded data",
                    t.id()
                )));
            }
        }
        let max_id = tasks.iter().map(|t| t.id()).max().unwrap_or(0);
        let next_id = id_after(max_id)?;
        self.tasks = tasks;
        self.next_id = next_id;
        tracing::debug!(count = self.tasks.len(), next_id = self.next_id, "restored tasks");
        Ok(())
    }

    /// Rebuild a collection from its persisted form. A stored counter ahead of
    /// the largest id is kept so ids freed by deletion are not reissued.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut collection = TaskCollection::new();
        collection.restore(snapshot.tasks)?;
        if snapshot.next_id < collection.next_id {
            tracing::warn!(
                stored = snapshot.next_id,
                next_id = collection.next_id,
                "stored id counter behind task ids, advancing"
            );
        }
        collection.next_id = collection.next_id.max(snapshot.next_id);
        Ok(collection)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            tasks: self.tasks.clone(),
        }
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }
}

/// The id following `id`, or a validation error once ids are exhausted.
fn id_after(id: u64) -> Result<u64> {
    id.checked_add(1)
        .ok_or_else(|| Error::validation(format!("task id {id} leaves no room for further ids")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn add(c: &mut TaskCollection, title: &str) -> u64 {
        c.create(title, "", date("2024-03-01"), Priority::Low, Category::Other)
            .unwrap()
            .id()
    }

    #[test]
    fn largest_possible_id_is_rejected_not_wrapped() {
        let last = Task::new(u64::MAX, "edge", "", date("2024-03-01"), Priority::Low, Category::Other)
            .unwrap();

        let snapshot = Snapshot {
            next_id: 1,
            tasks: vec![last.clone()],
        };
        assert!(matches!(
            TaskCollection::from_snapshot(snapshot),
            Err(Error::Validation(_))
        ));

        let mut c = TaskCollection::new();
        assert!(matches!(c.add(last), Err(Error::Validation(_))));
        assert!(c.is_empty());
        assert_eq!(c.next_id(), 1);
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut c = TaskCollection::new();
        assert_eq!(add(&mut c, "a"), 1);
        assert_eq!(add(&mut c, "b"), 2);
        assert_eq!(c.next_id(), 3);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut c = TaskCollection::new();
        add(&mut c, "a");
        let b = add(&mut c, "b");
        assert!(c.remove(b));
        assert_eq!(add(&mut c, "c"), 3);
    }

    #[test]
    fn failed_create_does_not_consume_an_id() {
        let mut c = TaskCollection::new();
        assert!(c
            .create(" ", "", date("2024-03-01"), Priority::Low, Category::Other)
            .is_err());
        assert_eq!(add(&mut c, "a"), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let mut c = TaskCollection::new();
        let a = add(&mut c, "a");
        assert!(c.remove(a));
        assert!(!c.remove(a));
    }

    #[test]
    fn get_missing_is_not_found() {
        let c = TaskCollection::new();
        assert!(matches!(c.get(9), Err(Error::NotFound(9))));
    }

    #[test]
    fn all_preserves_insertion_order_and_restarts() {
        let mut c = TaskCollection::new();
        add(&mut c, "first");
        add(&mut c, "second");
        add(&mut c, "third");
        let titles: Vec<_> = c.all().map(|t| t.title()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
        assert_eq!(c.all().count(), 3);
    }

    #[test]
    fn add_rejects_duplicate_ids_and_advances_counter() {
        let mut c = TaskCollection::new();
        let t = Task::new(10, "x", "", date("2024-03-01"), Priority::Low, Category::Work).unwrap();
        c.add(t.clone()).unwrap();
        assert!(matches!(c.add(t), Err(Error::Validation(_))));
        assert_eq!(c.next_id(), 11);
    }

    #[test]
    fn restore_advances_counter_past_max_id() {
        let mut c = TaskCollection::new();
        let tasks = vec![
            Task::new(4, "a", "", date("2024-03-01"), Priority::Low, Category::Work).unwrap(),
            Task::new(9, "b", "", date("2024-03-01"), Priority::Low, Category::Work).unwrap(),
        ];
        c.restore(tasks).unwrap();
        assert_eq!(c.next_id(), 10);
        assert_eq!(add(&mut c, "c"), 10);
    }

    #[test]
    fn restore_empty_resets_counter() {
        let mut c = TaskCollection::new();
        add(&mut c, "a");
        c.restore(Vec::new()).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.next_id(), 1);
    }

    #[test]
    fn restore_rejects_duplicate_ids() {
        let mut c = TaskCollection::new();
        let t = Task::new(2, "a", "", date("2024-03-01"), Priority::Low, Category::Work).unwrap();
        assert!(c.restore(vec![t.clone(), t]).is_err());
    }

    #[test]
    fn snapshot_round_trip_keeps_fields_and_counter() {
        let mut c = TaskCollection::new();
        add(&mut c, "a");
        let b = add(&mut c, "b");
        c.get_mut(1).unwrap().add_tag("Home");
        c.get_mut(1).unwrap().mark_complete();
        c.remove(b);

        let json = serde_json::to_string(&c.snapshot()).unwrap();
        let restored =
            TaskCollection::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.get(1).unwrap(), c.get(1).unwrap());
        // Counter survived even though the highest id was deleted.
        assert_eq!(restored.next_id(), 3);
        let mut restored = restored;
        assert!(add(&mut restored, "c") > 1);
    }
}
