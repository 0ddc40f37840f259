//! # TM - Personal Task Tracker
//!
//! A single-user task tracker with a scriptable CLI, a numbered interactive
//! menu and a full-screen terminal board (TUI).
//!
//! ## Key Features
//!
//! - **Rich Tasks**: Title, description, due date, priority, category, tags and estimated effort
//! - **Queries**: Keyword search, filters by category, priority, status, tag or overdue, and four sort orders
//! - **Statistics**: Completion rate, overdue count, per-category and per-priority breakdowns
//!   and the single most urgent pending task
//! - **Local File Storage**: One JSON file, written atomically, with text and CSV export
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the numbered menu
//! tm
//!
//! # Add a task via CLI
//! tm add "Quarterly report" --due friday --priority high --category work --tag finance
//!
//! # What's due this week?
//! tm upcoming 7
//!
//! # Launch the board
//! tm ui
//! ```
//!
//! Data is stored in `~/.tm/tasks.json` unless `--db`, `TM_DB` or `TM_HOME` say otherwise.
//!
//! # Module Organization
//!
//! - `task`: The task entity and its invariants
//! - `collection`: Id-keyed, insertion-ordered task storage
//! - `query`: Search, filters, sorts and the upcoming window
//! - `stats`: Aggregate statistics over a collection
//! - `db`: JSON persistence and due date parsing
//! - `display` / `export`: Text rendering, text and CSV export
//! - `cli` / `cmd`: Command-line interface using clap
//! - `menu`: Numbered interactive menu
//! - `tui`: Full-screen board using ratatui
//! - `config`: Data file location
//! - `error`: Error types and result aliases

pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod export;
pub mod fields;
pub mod menu;
pub mod query;
pub mod stats;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

pub use collection::TaskCollection;
pub use error::{Error, Result};
pub use task::Task;
