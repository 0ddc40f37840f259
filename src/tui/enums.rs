//! Enumerations for TUI state management.

use crate::fields::{SortKey, Status};

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    TaskList,
    TaskDetail,
    Help,
    Confirm,
}

/// Which tasks the board shows by completion.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StatusView {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusView {
    /// All → Pending → Completed → All.
    pub fn next(self) -> Self {
        match self {
            StatusView::All => StatusView::Pending,
            StatusView::Pending => StatusView::Completed,
            StatusView::Completed => StatusView::All,
        }
    }

    pub fn status(self) -> Option<Status> {
        match self {
            StatusView::All => None,
            StatusView::Pending => Some(Status::Pending),
            StatusView::Completed => Some(Status::Completed),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusView::All => "all",
            StatusView::Pending => "pending",
            StatusView::Completed => "completed",
        }
    }
}

/// Next sort order in the board's cycle. `None` is insertion order.
pub fn next_sort(current: Option<SortKey>) -> Option<SortKey> {
    match current {
        None => Some(SortKey::ALL[0]),
        Some(key) => SortKey::ALL
            .iter()
            .position(|k| *k == key)
            .and_then(|i| SortKey::ALL.get(i + 1))
            .copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_view_cycles_back_to_all() {
        let mut v = StatusView::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            v = v.next();
            seen.push(v.status());
        }
        assert_eq!(seen, vec![Some(Status::Pending), Some(Status::Completed), None]);
    }

    #[test]
    fn sort_cycle_visits_every_key_then_insertion_order() {
        let mut key = None;
        let mut seen = Vec::new();
        loop {
            key = next_sort(key);
            match key {
                Some(k) => seen.push(k),
                None => break,
            }
        }
        assert_eq!(seen, SortKey::ALL.to_vec());
    }
}
