//! Search, filter and sort operations over tasks.
//!
//! Everything here is a pure function from a sequence of task references to a
//! new ordered `Vec`. Inputs are never mutated and all sorts are stable, so
//! ties keep their input order.

use std::cmp::Reverse;

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::fields::{Category, Priority, SortKey, Status};
use crate::task::{normalise_tag, today, Task};

/// A single filter criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Category(Category),
    Priority(Priority),
    Status(Status),
    Overdue,
    Tag(String),
}

impl Filter {
    /// Build a filter from a criterion kind and its value, e.g.
    /// `("priority", "high")` or `("overdue", "")`.
    pub fn parse(kind: &str, value: &str) -> Result<Self> {
        match kind.trim().to_lowercase().as_str() {
            "category" => Ok(Filter::Category(value.parse()?)),
            "priority" => Ok(Filter::Priority(value.parse()?)),
            "status" => Ok(Filter::Status(value.parse()?)),
            "overdue" => Ok(Filter::Overdue),
            "tag" => Ok(Filter::Tag(normalise_tag(value))),
            other => Err(Error::validation(format!("unknown filter: '{other}'"))),
        }
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Filter::Category(c) => task.category() == *c,
            Filter::Priority(p) => task.priority() == *p,
            Filter::Status(Status::Completed) => task.is_completed(),
            Filter::Status(Status::Pending) => !task.is_completed(),
            Filter::Overdue => task.is_overdue_on(today),
            Filter::Tag(tag) => task.has_tag(tag),
        }
    }
}

/// Tasks whose title, description or tags contain `keyword`, ignoring case.
pub fn search<'a, I>(tasks: I, keyword: &str) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let keyword = keyword.to_lowercase();
    tasks
        .into_iter()
        .filter(|t| {
            t.title().to_lowercase().contains(&keyword)
                || t.description().to_lowercase().contains(&keyword)
                || t.tags().iter().any(|tag| tag.contains(&keyword))
        })
        .collect()
}

/// Apply a single filter, keeping input order.
pub fn filter<'a, I>(tasks: I, criterion: &Filter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let today = today();
    tasks
        .into_iter()
        .filter(|t| criterion.matches(t, today))
        .collect()
}

pub fn filter_by_category<'a, I>(tasks: I, category: Category) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter(tasks, &Filter::Category(category))
}

pub fn filter_by_priority<'a, I>(tasks: I, priority: Priority) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter(tasks, &Filter::Priority(priority))
}

pub fn filter_by_status<'a, I>(tasks: I, status: Status) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter(tasks, &Filter::Status(status))
}

pub fn filter_overdue<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter(tasks, &Filter::Overdue)
}

pub fn filter_by_tag<'a, I>(tasks: I, tag: &str) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter(tasks, &Filter::Tag(normalise_tag(tag)))
}

/// Pending tasks due within the next `days` days (today inclusive), earliest
/// first.
pub fn upcoming<'a, I>(tasks: I, days: i64) -> Result<Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    upcoming_from(tasks, days, today())
}

pub fn upcoming_from<'a, I>(tasks: I, days: i64, today: NaiveDate) -> Result<Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    if days < 0 {
        return Err(Error::validation(format!(
            "days to look ahead must be zero or more, got {days}"
        )));
    }
    let end = Duration::try_days(days)
        .and_then(|d| today.checked_add_signed(d))
        .unwrap_or(NaiveDate::MAX);
    let window: Vec<&Task> = tasks
        .into_iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.due_date() >= today && t.due_date() <= end)
        .collect();
    Ok(sort_by_due_date(window))
}

/// Earliest due date first.
pub fn sort_by_due_date<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut out: Vec<&Task> = tasks.into_iter().collect();
    out.sort_by_key(|t| t.due_date());
    out
}

/// Most pressing priority first.
pub fn sort_by_priority<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut out: Vec<&Task> = tasks.into_iter().collect();
    out.sort_by_key(|t| Reverse(t.priority()));
    out
}

/// Newest first.
pub fn sort_by_created_date<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut out: Vec<&Task> = tasks.into_iter().collect();
    out.sort_by_key(|t| Reverse(t.created_at()));
    out
}

/// Plain string order, so upper case sorts before lower case.
pub fn sort_by_title<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut out: Vec<&Task> = tasks.into_iter().collect();
    out.sort_by(|a, b| a.title().cmp(b.title()));
    out
}

pub fn sort<'a, I>(tasks: I, key: SortKey) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    match key {
        SortKey::Due => sort_by_due_date(tasks),
        SortKey::Priority => sort_by_priority(tasks),
        SortKey::Created => sort_by_created_date(tasks),
        SortKey::Title => sort_by_title(tasks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::TaskCollection;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id()).collect()
    }

    fn collection(specs: &[(&str, &str, Priority)]) -> TaskCollection {
        let mut c = TaskCollection::new();
        for (title, due, pri) in specs {
            c.create(title, "", date(due), *pri, Category::Work).unwrap();
        }
        c
    }

    #[test]
    fn search_matches_title_description_and_tags() {
        let mut c = TaskCollection::new();
        c.create("Buy Milk", "", date("2024-01-01"), Priority::Low, Category::Shopping)
            .unwrap();
        c.create("Call", "about the MILKMAN", date("2024-01-01"), Priority::Low, Category::Other)
            .unwrap();
        c.create("Gym", "", date("2024-01-01"), Priority::Low, Category::Health)
            .unwrap()
            .add_tag("dairy-milk");
        c.create("Unrelated", "", date("2024-01-01"), Priority::Low, Category::Other)
            .unwrap();

        assert_eq!(ids(&search(c.all(), "milk")), [1, 2, 3]);
        assert_eq!(ids(&search(c.all(), "MILK")), [1, 2, 3]);
        assert!(search(c.all(), "nothing").is_empty());
        // Surrounding whitespace is part of the keyword
        assert_eq!(ids(&search(c.all(), " milk")), [1, 2]);
    }

    #[test]
    fn filter_by_status_keeps_insertion_order() {
        let mut c = collection(&[
            ("a", "2024-01-01", Priority::Low),
            ("b", "2024-01-02", Priority::Low),
            ("c", "2024-01-03", Priority::Low),
        ]);
        c.get_mut(2).unwrap().mark_complete();
        let status: Status = "pending".parse().unwrap();
        assert_eq!(ids(&filter_by_status(c.all(), status)), [1, 3]);
        assert_eq!(ids(&filter_by_status(c.all(), Status::Completed)), [2]);
    }

    #[test]
    fn filter_by_category_priority_and_tag() {
        let mut c = TaskCollection::new();
        c.create("a", "", date("2024-01-01"), Priority::High, Category::Work)
            .unwrap()
            .add_tag("Office");
        c.create("b", "", date("2024-01-01"), Priority::Low, Category::Health)
            .unwrap();
        assert_eq!(ids(&filter_by_category(c.all(), Category::Health)), [2]);
        assert_eq!(ids(&filter_by_priority(c.all(), Priority::High)), [1]);
        assert_eq!(ids(&filter_by_tag(c.all(), " OFFICE")), [1]);
    }

    #[test]
    fn overdue_filter_skips_completed_tasks() {
        let mut c = collection(&[
            ("late", "2000-01-01", Priority::Low),
            ("late but done", "2000-01-01", Priority::Low),
            ("future", "2999-01-01", Priority::Low),
        ]);
        c.get_mut(2).unwrap().mark_complete();
        assert_eq!(ids(&filter_overdue(c.all())), [1]);
    }

    #[test]
    fn filter_parse_rejects_bad_criteria() {
        assert!(matches!(Filter::parse("status", "done"), Err(Error::Validation(_))));
        assert!(matches!(Filter::parse("colour", "red"), Err(Error::Validation(_))));
        assert_eq!(Filter::parse("Overdue", "").unwrap(), Filter::Overdue);
        assert_eq!(
            Filter::parse("tag", " Home ").unwrap(),
            Filter::Tag("home".to_string())
        );
    }

    #[test]
    fn upcoming_window_is_inclusive_and_sorted() {
        let today = date("2024-05-10");
        let c = collection(&[
            ("ten", "2024-05-20", Priority::Low),
            ("three", "2024-05-13", Priority::Low),
            ("today", "2024-05-10", Priority::Low),
            ("yesterday", "2024-05-09", Priority::Low),
        ]);
        let got = upcoming_from(c.all(), 5, today).unwrap();
        assert_eq!(ids(&got), [3, 2]);
        let edge = upcoming_from(c.all(), 3, today).unwrap();
        assert_eq!(ids(&edge), [3, 2]);
        let zero = upcoming_from(c.all(), 0, today).unwrap();
        assert_eq!(ids(&zero), [3]);
    }

    #[test]
    fn upcoming_skips_completed_tasks() {
        let today = date("2024-05-10");
        let mut c = collection(&[("a", "2024-05-11", Priority::Low)]);
        c.get_mut(1).unwrap().mark_complete();
        assert!(upcoming_from(c.all(), 7, today).unwrap().is_empty());
    }

    #[test]
    fn upcoming_rejects_negative_days() {
        let c = TaskCollection::new();
        assert!(matches!(upcoming(c.all(), -1), Err(Error::Validation(_))));
    }

    #[test]
    fn upcoming_tolerates_huge_windows() {
        let today = date("2024-05-10");
        let c = collection(&[("far", "2900-01-01", Priority::Low)]);
        assert_eq!(upcoming_from(c.all(), i64::MAX, today).unwrap().len(), 1);
    }

    #[test]
    fn sort_by_priority_puts_urgent_first() {
        let c = collection(&[
            ("low", "2024-01-01", Priority::Low),
            ("urgent", "2024-01-01", Priority::Urgent),
            ("medium", "2024-01-01", Priority::Medium),
        ]);
        let sorted = sort_by_priority(c.all());
        let pri: Vec<_> = sorted.iter().map(|t| t.priority()).collect();
        assert_eq!(pri, [Priority::Urgent, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn sorts_are_stable_on_ties() {
        let c = collection(&[
            ("x", "2024-01-02", Priority::High),
            ("y", "2024-01-01", Priority::High),
            ("z", "2024-01-02", Priority::High),
        ]);
        assert_eq!(ids(&sort_by_due_date(c.all())), [2, 1, 3]);
        assert_eq!(ids(&sort_by_priority(c.all())), [1, 2, 3]);
    }

    #[test]
    fn sort_by_title_is_case_sensitive() {
        let c = collection(&[
            ("banana", "2024-01-01", Priority::Low),
            ("Apple", "2024-01-01", Priority::Low),
            ("apple", "2024-01-01", Priority::Low),
        ]);
        assert_eq!(ids(&sort_by_title(c.all())), [2, 3, 1]);
    }

    #[test]
    fn sort_by_created_date_is_newest_first() {
        let c = collection(&[
            ("a", "2024-01-01", Priority::Low),
            ("b", "2024-01-01", Priority::Low),
        ]);
        let sorted = sort(c.all(), SortKey::Created);
        assert!(sorted[0].created_at() >= sorted[1].created_at());
    }

    #[test]
    fn queries_leave_input_untouched() {
        let c = collection(&[
            ("b", "2024-01-02", Priority::Low),
            ("a", "2024-01-01", Priority::Urgent),
        ]);
        let _ = sort(c.all(), SortKey::Title);
        let _ = sort(c.all(), SortKey::Priority);
        let order: Vec<_> = c.all().map(|t| t.id()).collect();
        assert_eq!(order, [1, 2]);
    }
}
