//! Enumerations and field types for task management.
//!
//! This module defines the closed value sets used to classify and order tasks:
//! priorities, categories, completion status and sort keys. Every enum parses
//! strictly by name (case-insensitive); anything else is a validation error.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Priority of a task, ordered from least to most pressing.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "LOW")]
    Low,
    #[serde(alias = "MEDIUM")]
    Medium,
    #[serde(alias = "HIGH")]
    High,
    #[serde(alias = "URGENT")]
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

/// Life area a task belongs to.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[serde(alias = "WORK")]
    Work,
    #[serde(alias = "PERSONAL")]
    Personal,
    #[serde(alias = "STUDY")]
    Study,
    #[serde(alias = "SHOPPING")]
    Shopping,
    #[serde(alias = "HEALTH")]
    Health,
    #[serde(alias = "FINANCE")]
    Finance,
    #[serde(alias = "OTHER")]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Shopping,
        Category::Health,
        Category::Finance,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "WORK",
            Category::Personal => "PERSONAL",
            Category::Study => "STUDY",
            Category::Shopping => "SHOPPING",
            Category::Health => "HEALTH",
            Category::Finance => "FINANCE",
            Category::Other => "OTHER",
        }
    }
}

/// Completion status used as a filter criterion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Completed,
    Pending,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Completed, Status::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Pending => "pending",
        }
    }
}

/// Available orderings for task lists.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    /// Due date, earliest first.
    Due,
    /// Priority, most pressing first.
    Priority,
    /// Creation time, newest first.
    Created,
    /// Title, alphabetical.
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Due,
        SortKey::Priority,
        SortKey::Created,
        SortKey::Title,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Due => "Due Date",
            SortKey::Priority => "Priority",
            SortKey::Created => "Creation Date",
            SortKey::Title => "Title",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| Error::validation(format!("unknown {}: '{}'", $what, wanted)))
            }
        }
    };
}

display_and_parse!(Priority, "priority");
display_and_parse!(Category, "category");

display_and_parse!(Status, "status");

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "due" | "due-date" => Ok(SortKey::Due),
            "priority" => Ok(SortKey::Priority),
            "created" | "creation-date" => Ok(SortKey::Created),
            "title" => Ok(SortKey::Title),
            other => Err(Error::validation(format!("unknown sort key: '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_low_to_urgent() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Urgent);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" Finance ".parse::<Category>().unwrap(), Category::Finance);
        assert_eq!("PENDING".parse::<Status>().unwrap(), Status::Pending);
        assert_eq!("title".parse::<SortKey>().unwrap(), SortKey::Title);
    }

    #[test]
    fn rejects_unknown_names_as_validation_errors() {
        assert!(matches!("critical".parse::<Priority>(), Err(Error::Validation(_))));
        assert!(matches!("hobby".parse::<Category>(), Err(Error::Validation(_))));
        assert!(matches!("done".parse::<Status>(), Err(Error::Validation(_))));
        assert!(matches!("size".parse::<SortKey>(), Err(Error::Validation(_))));
    }

    #[test]
    fn numeric_choices_are_not_names() {
        assert!("2".parse::<Priority>().is_err());
    }

    #[test]
    fn serde_accepts_upper_case_aliases() {
        let p: Priority = serde_json::from_str("\"URGENT\"").unwrap();
        assert_eq!(p, Priority::Urgent);
        assert_eq!(serde_json::to_string(&Category::Shopping).unwrap(), "\"shopping\"");
    }
}
