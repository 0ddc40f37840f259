//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the collection while the
//! board is open, keeps a sorted and filtered view of task ids, handles key
//! presses and renders the table, detail, help and confirmation screens.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::collection::TaskCollection;
use crate::db;
use crate::display::{format_due_relative, render_task, status_label};
use crate::error::Result;
use crate::fields::SortKey;
use crate::query::{self, Filter};
use crate::stats::TaskStatistics;
use crate::task::{today, Task};
use crate::tui::{
    colors::{priority_color, DARK_GREEN, DARK_PURPLE, DARK_RED},
    enums::{next_sort, AppState, StatusView},
    input::InputField,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    tasks: TaskCollection,
    db_path: PathBuf,
    task_list_state: TableState,
    filtered_tasks: Vec<u64>,
    status_message: String,
    search: InputField,
    search_active: bool,
    sort_key: Option<SortKey>,
    status_view: StatusView,
    overdue_only: bool,
    confirm_action: Option<String>,
    dirty: bool,
}

impl App {
    pub fn new(tasks: TaskCollection, db_path: &Path) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            tasks,
            db_path: db_path.to_path_buf(),
            task_list_state: TableState::default(),
            filtered_tasks: Vec::new(),
            status_message: String::new(),
            search: InputField::new(),
            search_active: false,
            sort_key: None,
            status_view: StatusView::All,
            overdue_only: false,
            confirm_action: None,
            dirty: false,
        };
        app.update_filtered_tasks();
        app
    }

    /// Rebuild the visible id list from the search text, status view,
    /// overdue toggle and sort key. Keeps the selected task when it is still
    /// visible.
    fn update_filtered_tasks(&mut self) {
        let old_selected_id = self.selected_id();
        let today = today();

        let mut view: Vec<&Task> = if self.search.is_empty() {
            self.tasks.all().collect()
        } else {
            query::search(self.tasks.all(), &self.search.value)
        };
        if let Some(status) = self.status_view.status() {
            let wanted = Filter::Status(status);
            view.retain(|t| wanted.matches(t, today));
        }
        if self.overdue_only {
            view.retain(|t| t.is_overdue_on(today));
        }
        if let Some(key) = self.sort_key {
            view = query::sort(view, key);
        }
        self.filtered_tasks = view.iter().map(|t| t.id()).collect();

        let restored = old_selected_id
            .and_then(|id| self.filtered_tasks.iter().position(|&v| v == id));
        self.task_list_state.select(match restored {
            Some(idx) => Some(idx),
            None if self.filtered_tasks.is_empty() => None,
            None => Some(0),
        });
    }

    fn selected_id(&self) -> Option<u64> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.filtered_tasks.get(idx))
            .copied()
    }

    fn get_selected_task(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.tasks.get(id).ok())
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn save(&mut self) -> Result<()> {
        db::save(&self.tasks, &self.db_path)?;
        self.dirty = false;
        Ok(())
    }

    fn toggle_selected_completion(&mut self) -> Result<()> {
        let Some(id) = self.selected_id() else {
            return Ok(());
        };
        let task = self.tasks.get_mut(id)?;
        let msg = if task.is_completed() {
            task.mark_incomplete();
            format!("Task {id} reopened")
        } else {
            task.mark_complete();
            format!("Task {id} completed")
        };
        self.dirty = true;
        self.update_filtered_tasks();
        self.set_status_message(msg);
        Ok(())
    }

    fn delete_selected_task(&mut self) {
        if let Some(id) = self.selected_id() {
            if self.tasks.remove(id) {
                self.dirty = true;
                self.update_filtered_tasks();
                self.set_status_message(format!("Deleted task {id}"));
            }
        }
    }

    fn ask_delete(&mut self) {
        if let Some(task) = self.get_selected_task() {
            let action = format!("Delete task {}: {}", task.id(), task.title());
            self.confirm_action = Some(action);
            self.state = AppState::Confirm;
        }
    }

    /// Handle a key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        self.status_message.clear();
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key, modifiers),
            AppState::TaskDetail => self.handle_detail_input(key),
            AppState::Help => {
                if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) {
                    self.state = AppState::TaskList;
                }
                Ok(false)
            }
            AppState::Confirm => {
                match key {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        self.delete_selected_task();
                        self.state = AppState::TaskList;
                        self.confirm_action = None;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        self.state = AppState::TaskList;
                        self.confirm_action = None;
                    }
                    _ => {}
                }
                Ok(false)
            }
        }
    }

    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        if self.search_active {
            match key {
                KeyCode::Esc => {
                    self.search_active = false;
                    self.search.clear();
                    self.update_filtered_tasks();
                }
                KeyCode::Enter => {
                    self.search_active = false;
                    if !self.search.is_empty() {
                        self.set_status_message(format!(
                            "Search applied: '{}' ({} tasks)",
                            self.search.value,
                            self.filtered_tasks.len()
                        ));
                    }
                }
                KeyCode::Backspace => {
                    self.search.handle_backspace();
                    self.update_filtered_tasks();
                }
                KeyCode::Delete => {
                    self.search.handle_delete();
                    self.update_filtered_tasks();
                }
                KeyCode::Left => self.search.move_cursor_left(),
                KeyCode::Right => self.search.move_cursor_right(),
                KeyCode::Char(c) => {
                    self.search.handle_char(c);
                    self.update_filtered_tasks();
                }
                _ => {}
            }
            return Ok(false);
        }

        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return self.quit(),
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Esc => {
                if self.search.is_empty() {
                    return self.quit();
                }
                self.search.clear();
                self.update_filtered_tasks();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected > 0 {
                        self.task_list_state.select(Some(selected - 1));
                    }
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.filtered_tasks.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Enter => {
                if self.selected_id().is_some() {
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char(' ') => self.toggle_selected_completion()?,
            KeyCode::Char('d') => self.ask_delete(),
            KeyCode::Char('s') => {
                self.sort_key = next_sort(self.sort_key);
                self.update_filtered_tasks();
                let label = self.sort_key.map_or("insertion order", |k| k.label());
                self.set_status_message(format!("Sorted by {label}"));
            }
            KeyCode::Char('f') => {
                self.status_view = self.status_view.next();
                self.update_filtered_tasks();
                self.set_status_message(format!("Showing {} tasks", self.status_view.label()));
            }
            KeyCode::Char('o') => {
                self.overdue_only = !self.overdue_only;
                self.update_filtered_tasks();
                let msg = if self.overdue_only { "Overdue only" } else { "Overdue filter off" };
                self.set_status_message(msg.to_string());
            }
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        Ok(false)
    }

    fn handle_detail_input(&mut self, key: KeyCode) -> Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.state = AppState::TaskList,
            KeyCode::Char(' ') => self.toggle_selected_completion()?,
            KeyCode::Char('d') => self.ask_delete(),
            _ => {}
        }
        Ok(false)
    }

    fn quit(&mut self) -> Result<bool> {
        if self.dirty {
            self.save()?;
        }
        Ok(true)
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = today();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let stats = TaskStatistics::new(&self.tasks);
        let summary = format!(
            "Total {} | Done {} ({:.1}%) | Pending {} | Overdue {}",
            stats.total(),
            stats.completed(),
            stats.completion_rate(),
            stats.pending(),
            stats.overdue()
        );
        let header_text = vec![Line::from(vec![
            Span::styled("TASK MANAGER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                summary,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let header_cells = ["ID", "Pri", "Category", "Status", "Due", "Title"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .filtered_tasks
            .iter()
            .filter_map(|&id| self.tasks.get(id).ok())
            .map(|task| {
                let tags = if task.tags().is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", task.tags().join(","))
                };
                let style = if task.is_completed() {
                    Style::default().fg(Color::DarkGray)
                } else if task.is_overdue_on(today) {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(priority_color(task.priority()))
                };
                Row::new(vec![
                    Cell::from(task.id().to_string()),
                    Cell::from(task.priority().to_string()),
                    Cell::from(task.category().to_string()),
                    Cell::from(status_label(task, today)),
                    Cell::from(format_due_relative(task.due_date(), today)),
                    Cell::from(format!("{}{}", task.title(), tags)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(5),  // ID
            Constraint::Length(7),  // Pri
            Constraint::Length(9),  // Category
            Constraint::Length(10), // Status
            Constraint::Length(12), // Due
            Constraint::Min(20),    // Title
        ];

        let sort = self.sort_key.map_or("insertion", |k| k.label());
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - sort: {} - view: {}{} - Press 'h' for help",
                self.filtered_tasks.len(),
                self.tasks.len(),
                sort,
                self.status_view.label(),
                if self.overdue_only { ", overdue" } else { "" }
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.task_list_state);
    }

    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(task) = self.get_selected_task() else {
            return;
        };
        let lines: Vec<Line> = render_task(task, today())
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task Details - Esc to return")
                    .border_style(Style::default().fg(DARK_GREEN)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(vec![Span::styled("Task Manager Help", bold)]),
            Line::from(""),
            Line::from(vec![Span::styled("Task List:", bold)]),
            Line::from("  ↑/k, ↓/j     Navigate tasks"),
            Line::from("  Enter        View task details"),
            Line::from("  Space        Toggle completion"),
            Line::from("  d            Delete selected task"),
            Line::from("  s            Cycle sort (insertion → due → priority → created → title)"),
            Line::from("  f            Cycle status view (all → pending → completed)"),
            Line::from("  o            Toggle overdue only"),
            Line::from("  /            Search title, description and tags"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc        Save and quit"),
            Line::from(""),
            Line::from(vec![Span::styled("Task Detail View:", bold)]),
            Line::from("  Space        Toggle completion"),
            Line::from("  d            Delete task"),
            Line::from("  Esc/q        Back to task list"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press Esc to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(self.confirm_action.as_deref().unwrap_or("")),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            format!("Search: {} (Esc to clear, Enter to confirm)", self.search.value)
        } else if !self.search.is_empty() {
            format!(
                "Tasks: {} (matching '{}') | Press 'h' for help",
                self.filtered_tasks.len(),
                self.search.value
            )
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.filtered_tasks.len())
                }
                AppState::TaskDetail => "Task Details".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop. Renders and handles input until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code, key.modifiers)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use chrono::Duration as Days;
    use ratatui::backend::TestBackend;

    fn board(dir: &tempfile::TempDir) -> App {
        let today = today();
        let mut c = TaskCollection::new();
        c.create("Write report", "", today + Days::days(5), Priority::Medium, Category::Work)
            .unwrap();
        c.create("Pay rent", "", today - Days::days(2), Priority::Urgent, Category::Finance)
            .unwrap();
        c.create("Buy milk", "dairy", today + Days::days(1), Priority::Low, Category::Shopping)
            .unwrap();
        App::new(c, &dir.path().join("tasks.json"))
    }

    fn press(app: &mut App, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn starts_in_insertion_order_with_first_selected() {
        let dir = tempfile::tempdir().unwrap();
        let app = board(&dir);
        assert_eq!(app.filtered_tasks, vec![1, 2, 3]);
        assert_eq!(app.selected_id(), Some(1));
    }

    #[test]
    fn sort_key_cycles_and_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = board(&dir);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.sort_key, Some(SortKey::Due));
        assert_eq!(app.filtered_tasks, vec![2, 3, 1]);
        assert_eq!(app.selected_id(), Some(1));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.filtered_tasks, vec![2, 1, 3]);
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('s'));
        }
        assert_eq!(app.sort_key, None);
        assert_eq!(app.filtered_tasks, vec![1, 2, 3]);
    }

    #[test]
    fn space_toggles_and_status_view_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = board(&dir);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.tasks.get(1).unwrap().is_completed());

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filtered_tasks, vec![2, 3]);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filtered_tasks, vec![1]);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.tasks.get(1).unwrap().is_completed());
        assert!(app.filtered_tasks.is_empty());
        assert_eq!(app.selected_id(), None);
    }

    #[test]
    fn overdue_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = board(&dir);
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.filtered_tasks, vec![2]);
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.filtered_tasks.len(), 3);
    }

    #[test]
    fn search_narrows_and_escape_clears() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = board(&dir);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "DAIRY");
        assert_eq!(app.filtered_tasks, vec![3]);
        // Letters go to the search box, not to commands
        assert_eq!(app.sort_key, None);
        press(&mut app, KeyCode::Enter);
        assert!(!app.search_active);
        assert!(app.status_message.contains("1 tasks"));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filtered_tasks.len(), 3);
    }

    #[test]
    fn delete_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = board(&dir);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.tasks.len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state, AppState::TaskList);
        assert!(app.tasks.get(2).is_err());
        assert_eq!(app.filtered_tasks, vec![1, 3]);
    }

    #[test]
    fn quit_saves_only_when_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut app = board(&dir);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(!path.exists());

        let mut app = board(&dir);
        press(&mut app, KeyCode::Char(' '));
        assert!(press(&mut app, KeyCode::Char('q')));
        let saved = db::load(&path).unwrap();
        assert!(saved.get(1).unwrap().is_completed());
    }

    #[test]
    fn renders_table_detail_and_help() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = board(&dir);
        let list = screen(&mut app);
        assert!(list.contains("TASK MANAGER"));
        assert!(list.contains("Pay rent"));
        assert!(list.contains("OVERDUE"));

        press(&mut app, KeyCode::Enter);
        assert!(screen(&mut app).contains("[1] Write report (MEDIUM)"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('h'));
        assert!(screen(&mut app).contains("Task Manager Help"));
    }
}
