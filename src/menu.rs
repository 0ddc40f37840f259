//! Numbered interactive menu.
//!
//! A line-oriented loop over stdin/stdout offering every action of the
//! tracker. The session owns the collection for its lifetime and saves it on
//! exit (option 0 or end of input). Enum prompts accept either the 1-based
//! number shown in the listing or the name.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::collection::TaskCollection;
use crate::db::{self, parse_due_input};
use crate::display::{render_stats, render_task};
use crate::error::{Error, Result};
use crate::export::{export_to_file, ExportFormat};
use crate::fields::{Category, Priority, SortKey, Status};
use crate::query::{self, Filter};
use crate::stats::TaskStatistics;
use crate::task::{today, Task};

const MENU: &str = "
MAIN MENU
============
1)  Add New Task
2)  Update Task
3)  Delete Task
4)  Mark Complete
5)  Mark Incomplete
6)  List All Tasks
7)  List Pending Tasks
8)  Search Tasks
9)  Filter Tasks
10) Sort Tasks
11) Show Task Details
12) Manage Tags
13) Show Statistics
14) Export to Text File
15) Import from Text File
16) Show Upcoming Tasks
0)  Exit
";

/// An interactive menu session.
pub struct MenuSession<R, W> {
    tasks: TaskCollection,
    db_path: PathBuf,
    export_path: PathBuf,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> MenuSession<R, W> {
    pub fn new(tasks: TaskCollection, db_path: PathBuf, input: R, out: W) -> Self {
        let export_path = db_path
            .parent()
            .map(|p| p.join(ExportFormat::Text.default_file()))
            .unwrap_or_else(|| PathBuf::from(ExportFormat::Text.default_file()));
        MenuSession {
            tasks,
            db_path,
            export_path,
            input,
            out,
        }
    }

    pub fn tasks(&self) -> &TaskCollection {
        &self.tasks
    }

    /// Run until the user exits or input ends, then save. The collection is
    /// saved even when the session itself fails.
    pub fn run(&mut self) -> Result<()> {
        let outcome = self.session();
        db::save(&self.tasks, &self.db_path)?;
        outcome?;
        writeln!(self.out, "Saved {} tasks. Goodbye!", self.tasks.len())?;
        Ok(())
    }

    /// The menu loop. Action failures are reported and the loop continues;
    /// only end of input, option 0 or a broken terminal ends it.
    fn session(&mut self) -> Result<()> {
        writeln!(self.out, "\nTASK MANAGER")?;
        loop {
            write!(self.out, "{MENU}\nChoose option: ")?;
            self.out.flush()?;
            let choice = match self.read_line() {
                Ok(line) => line,
                Err(e) if is_eof(&e) => return Ok(()),
                Err(e) => return Err(e),
            };
            if choice == "0" {
                return Ok(());
            }
            match self.dispatch(&choice) {
                Ok(()) => {}
                Err(e) if is_eof(&e) => return Ok(()),
                Err(e) => writeln!(self.out, "Error: {e}")?,
            }
        }
    }

    fn dispatch(&mut self, choice: &str) -> Result<()> {
        match choice {
            "1" => self.add_task(),
            "2" => self.update_task(),
            "3" => self.delete_task(),
            "4" => self.set_completion(true),
            "5" => self.set_completion(false),
            "6" => self.list_tasks(),
            "7" => self.list_pending(),
            "8" => self.search_tasks(),
            "9" => self.filter_tasks(),
            "10" => self.sort_tasks(),
            "11" => self.show_details(),
            "12" => self.manage_tags(),
            "13" => self.show_statistics(),
            "14" => self.export_text(),
            "15" => {
                writeln!(self.out, "Import is not supported; the data file is loaded at start-up.")?;
                Ok(())
            }
            "16" => self.show_upcoming(),
            _ => {
                writeln!(self.out, "Invalid choice. Please try again.")?;
                Ok(())
            }
        }
    }

    fn add_task(&mut self) -> Result<()> {
        writeln!(self.out, "\nADD NEW TASK")?;
        let title = self.prompt("Title: ")?;
        if title.is_empty() {
            writeln!(self.out, "Title cannot be empty!")?;
            return Ok(());
        }
        let desc = self.prompt("Description: ")?;
        let due = loop {
            let raw = self.prompt("Due date (yyyy-mm-dd): ")?;
            match parse_due_input(&raw) {
                Ok(d) => {
                    if d < today() {
                        writeln!(self.out, "Warning: Due date is in the past!")?;
                    }
                    break d;
                }
                Err(e) => writeln!(self.out, "{e}")?,
            }
        };
        let priority = self.choose(&Priority::ALL, "priority")?;
        let category = self.choose(&Category::ALL, "category")?;
        let hours = self.prompt("Estimated hours (0 for none): ")?;
        let hours = parse_number(&hours)?;

        let task = self.tasks.create(&title, &desc, due, priority, category)?;
        if hours > 0 {
            task.set_estimated_hours(hours);
        }
        let card = render_task(task, today());
        writeln!(self.out, "\nTask added successfully!\n{card}")?;
        Ok(())
    }

    fn update_task(&mut self) -> Result<()> {
        let Some(id) = self.find_task_id()? else {
            return Ok(());
        };
        let current = self.tasks.get(id)?.clone();
        writeln!(self.out, "\nUPDATE TASK\n{}", render_task(&current, today()))?;
        writeln!(self.out, "\nEnter new values (leave empty to keep current):")?;

        let title = self.prompt(&format!("New title [{}]: ", current.title()))?;
        let desc = self.prompt(&format!("New description [{}]: ", current.description()))?;
        let due = self.prompt(&format!("New due date [{}]: ", current.due_date()))?;
        let pri = self.prompt(&format!("New priority [{}] (LOW/MEDIUM/HIGH/URGENT): ", current.priority()))?;
        let cat = self.prompt(&format!("New category [{}] (WORK/PERSONAL/STUDY/...): ", current.category()))?;
        let hours = self.prompt(&format!("New estimated hours [{}]: ", current.estimated_hours()))?;

        let mut notes = Vec::new();
        let task = self.tasks.get_mut(id)?;
        if !title.is_empty() {
            task.set_title(title);
        }
        if !desc.is_empty() {
            task.set_description(desc);
        }
        if !due.is_empty() {
            match parse_due_input(&due) {
                Ok(d) => task.set_due_date(d),
                Err(_) => notes.push("Invalid date format. Keeping current date."),
            }
        }
        if !pri.is_empty() {
            match pri.parse::<Priority>() {
                Ok(p) => task.set_priority(p),
                Err(_) => notes.push("Invalid priority. Keeping current."),
            }
        }
        if !cat.is_empty() {
            match cat.parse::<Category>() {
                Ok(c) => task.set_category(c),
                Err(_) => notes.push("Invalid category. Keeping current."),
            }
        }
        if !hours.is_empty() {
            match parse_number(&hours) {
                Ok(h) => task.set_estimated_hours(h),
                Err(_) => notes.push("Invalid number. Keeping current."),
            }
        }
        let card = render_task(task, today());
        for note in notes {
            writeln!(self.out, "{note}")?;
        }
        writeln!(self.out, "\nTask updated successfully!\n{card}")?;
        Ok(())
    }

    fn delete_task(&mut self) -> Result<()> {
        let Some(id) = self.find_task_id()? else {
            return Ok(());
        };
        let card = render_task(self.tasks.get(id)?, today());
        writeln!(self.out, "\nDELETE TASK\n{card}")?;
        let confirm = self
            .prompt("\nAre you sure you want to delete this task? (yes/no): ")?
            .to_lowercase();
        if confirm == "yes" || confirm == "y" {
            self.tasks.remove(id);
            writeln!(self.out, "Task deleted successfully!")?;
        } else {
            writeln!(self.out, "Deletion cancelled.")?;
        }
        Ok(())
    }

    fn set_completion(&mut self, done: bool) -> Result<()> {
        let Some(id) = self.find_task_id()? else {
            return Ok(());
        };
        let task = self.tasks.get_mut(id)?;
        if done {
            task.mark_complete();
        } else {
            task.mark_incomplete();
        }
        let card = render_task(task, today());
        let verdict = if done { "complete" } else { "incomplete" };
        writeln!(self.out, "Task marked as {verdict}!\n{card}")?;
        Ok(())
    }

    fn list_tasks(&mut self) -> Result<()> {
        if self.tasks.is_empty() {
            writeln!(self.out, "\nNo tasks available.")?;
            return Ok(());
        }
        let all: Vec<&Task> = self.tasks.all().collect();
        write_cards(&mut self.out, "ALL TASKS", &all)?;
        writeln!(self.out, "\nTotal: {} tasks", all.len())?;
        Ok(())
    }

    fn list_pending(&mut self) -> Result<()> {
        let pending = query::filter_by_status(self.tasks.all(), Status::Pending);
        if pending.is_empty() {
            writeln!(self.out, "\nNo pending tasks!")?;
            return Ok(());
        }
        write_cards(&mut self.out, "PENDING TASKS", &pending)?;
        writeln!(self.out, "\nTotal pending: {} tasks", pending.len())?;
        Ok(())
    }

    fn search_tasks(&mut self) -> Result<()> {
        let keyword = self.prompt("Enter search keyword: ")?.to_lowercase();
        let results = query::search(self.tasks.all(), &keyword);
        if results.is_empty() {
            writeln!(self.out, "No tasks found matching: {keyword}")?;
            return Ok(());
        }
        write_cards(&mut self.out, &format!("Search Results for '{keyword}'"), &results)?;
        writeln!(self.out, "\nFound: {} tasks", results.len())?;
        Ok(())
    }

    fn filter_tasks(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\nFilter by:\n1. Category\n2. Priority\n3. Status (Completed/Pending)\n4. Overdue\n5. Tag"
        )?;
        let criterion = match self.prompt("Choose filter: ")?.as_str() {
            "1" => Filter::Category(self.prompt("Enter category: ")?.parse()?),
            "2" => Filter::Priority(self.prompt("Enter priority: ")?.parse()?),
            "3" => Filter::Status(self.prompt("Enter status (completed/pending): ")?.parse()?),
            "4" => Filter::Overdue,
            "5" => Filter::parse("tag", &self.prompt("Enter tag: ")?)?,
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                return Ok(());
            }
        };
        let results = query::filter(self.tasks.all(), &criterion);
        if results.is_empty() {
            writeln!(self.out, "No tasks match the filter.")?;
            return Ok(());
        }
        write_cards(&mut self.out, "Filtered Tasks", &results)?;
        writeln!(self.out, "\nFound: {} tasks", results.len())?;
        Ok(())
    }

    fn sort_tasks(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\nSort by:\n1. Due Date (earliest first)\n2. Priority (highest first)\n3. Creation Date (newest first)\n4. Title (alphabetical)"
        )?;
        let choice = self.prompt("Choose sort option: ")?;
        let key = match choice.parse::<usize>() {
            Ok(n @ 1..=4) => SortKey::ALL[n - 1],
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                return Ok(());
            }
        };
        let sorted = query::sort(self.tasks.all(), key);
        write_cards(&mut self.out, &format!("Sorted by {}", key.label()), &sorted)?;
        Ok(())
    }

    fn show_details(&mut self) -> Result<()> {
        let Some(id) = self.find_task_id()? else {
            return Ok(());
        };
        let card = render_task(self.tasks.get(id)?, today());
        writeln!(self.out, "\nTASK DETAILS\n{card}")?;
        Ok(())
    }

    fn manage_tags(&mut self) -> Result<()> {
        let Some(id) = self.find_task_id()? else {
            return Ok(());
        };
        let current = self.tasks.get(id)?.tags().join(", ");
        writeln!(self.out, "\nMANAGE TAGS\nCurrent tags: [{current}]\n\n1. Add tag\n2. Remove tag")?;
        match self.prompt("Choose option: ")?.as_str() {
            "1" => {
                let tag = self.prompt("Enter tag to add: ")?;
                self.tasks.get_mut(id)?.add_tag(&tag);
                writeln!(self.out, "Tag added!")?;
            }
            "2" => {
                let tag = self.prompt("Enter tag to remove: ")?;
                self.tasks.get_mut(id)?.remove_tag(&tag);
                writeln!(self.out, "Tag removed!")?;
            }
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                return Ok(());
            }
        }
        let updated = self.tasks.get(id)?.tags().join(", ");
        writeln!(self.out, "Updated tags: [{updated}]")?;
        Ok(())
    }

    fn show_statistics(&mut self) -> Result<()> {
        let report = render_stats(&TaskStatistics::new(&self.tasks));
        write!(self.out, "\n{report}")?;
        Ok(())
    }

    fn export_text(&mut self) -> Result<()> {
        let all: Vec<&Task> = self.tasks.all().collect();
        export_to_file(&all, ExportFormat::Text, &self.export_path, today())?;
        writeln!(self.out, "Tasks exported to '{}'", self.export_path.display())?;
        Ok(())
    }

    fn show_upcoming(&mut self) -> Result<()> {
        let days = parse_number(&self.prompt("\nEnter number of days to look ahead: ")?)?;
        let upcoming = query::upcoming(self.tasks.all(), days)?;
        if upcoming.is_empty() {
            writeln!(self.out, "\nNo tasks due in the next {days} days.")?;
            return Ok(());
        }
        write_cards(&mut self.out, &format!("UPCOMING TASKS (Next {days} days)"), &upcoming)?;
        writeln!(self.out, "\nTotal upcoming: {} tasks", upcoming.len())?;
        Ok(())
    }

    /// Ask for a task id, offering the full list on "list". Returns `None`
    /// after telling the user why when no valid task was chosen.
    fn find_task_id(&mut self) -> Result<Option<u64>> {
        if self.tasks.is_empty() {
            writeln!(self.out, "No tasks available.")?;
            return Ok(None);
        }
        let mut input = self.prompt("\nEnter Task ID (or 'list' to see all): ")?;
        if input.eq_ignore_ascii_case("list") {
            self.list_tasks()?;
            input = self.prompt("\nEnter Task ID: ")?;
        }
        let Ok(id) = input.parse::<u64>() else {
            writeln!(self.out, "Invalid ID format.")?;
            return Ok(None);
        };
        match self.tasks.get(id) {
            Ok(_) => Ok(Some(id)),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                Ok(None)
            }
        }
    }

    /// Pick one of `options` by 1-based number or by name, re-asking until valid.
    fn choose<T>(&mut self, options: &[T], what: &str) -> Result<T>
    where
        T: Copy + Display + FromStr,
    {
        writeln!(self.out)?;
        for (i, opt) in options.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, opt)?;
        }
        loop {
            let raw = self.prompt(&format!("Choose {} (1-{}): ", what, options.len()))?;
            if let Ok(n) = raw.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(options[n - 1]);
                }
            } else if let Ok(v) = raw.parse::<T>() {
                return Ok(v);
            }
            writeln!(self.out, "Invalid {what}. Please enter a number or name.")?;
        }
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input").into());
        }
        Ok(line.trim().to_string())
    }
}

fn write_cards<W: Write>(out: &mut W, heading: &str, tasks: &[&Task]) -> Result<()> {
    writeln!(out, "\n{heading}")?;
    writeln!(out, "{}", "=".repeat(heading.chars().count()))?;
    let today = today();
    for task in tasks {
        writeln!(out, "\n{}", render_task(task, today))?;
    }
    Ok(())
}

fn parse_number(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .map_err(|_| Error::validation(format!("invalid number format: '{}'", s.trim())))
}

fn is_eof(e: &Error) -> bool {
    matches!(e, Error::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
}
