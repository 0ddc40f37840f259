//! tm - personal task tracker CLI.

use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use task_manager::cli::Cli;
use task_manager::cmd::*;
use task_manager::config::Settings;
use task_manager::db;
use task_manager::error::Result;
use task_manager::menu::MenuSession;
use task_manager::tui::run::run_tui;

fn main() {
    // Tracing is opt-in via RUST_LOG and goes to stderr so it never mixes
    // with command output.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions don't need a data file
    if let Some(Commands::Completions { shell }) = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let settings = Settings::resolve(cli.db.as_deref())?;
    let db_path = settings.db_path;
    let mut tasks = db::load(&db_path)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Add { title, desc, due, priority, category, tags, hours } =>
            cmd_add(&mut tasks, &db_path, title, desc, due, priority, category, tags, hours),

        Commands::Update { id, title, desc, due, priority, category, hours } =>
            cmd_update(&mut tasks, &db_path, id, title, desc, due, priority, category, hours),

        Commands::Delete { id } => cmd_delete(&mut tasks, &db_path, id),

        Commands::Complete { id } => cmd_complete(&mut tasks, &db_path, id),

        Commands::Reopen { id } => cmd_reopen(&mut tasks, &db_path, id),

        Commands::List { pending } => cmd_list(&tasks, pending),

        Commands::View { id } => cmd_view(&tasks, id),

        Commands::Search { keyword } => cmd_search(&tasks, &keyword),

        Commands::Filter { kind, value } => cmd_filter(&tasks, &kind, &value),

        Commands::Sort { key } => cmd_sort(&tasks, key),

        Commands::Tag { action } => cmd_tag(&mut tasks, &db_path, action),

        Commands::Stats { json } => cmd_stats(&tasks, json),

        Commands::Upcoming { days } => cmd_upcoming(&tasks, days),

        Commands::Export { format, output } => cmd_export(&tasks, format, output),

        Commands::Menu => {
            let stdin = io::stdin();
            MenuSession::new(tasks, db_path, stdin.lock(), io::stdout()).run()
        }

        Commands::Ui => run_tui(tasks, &db_path),

        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
