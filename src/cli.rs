use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task manager CLI.
/// Storage defaults to ~/.tm/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tm", version, about = "Personal task tracker")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true, env = "TM_DB")]
    pub db: Option<PathBuf>,

    /// Command to run. Opens the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
