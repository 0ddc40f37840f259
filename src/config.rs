//! Data file location.
//!
//! Resolution order for the task file:
//! 1. `--db <path>` (or the `TM_DB` environment variable, handled by clap)
//! 2. `$TM_HOME/tasks.json`
//! 3. `$HOME/.tm/tasks.json`, falling back to `./.tm/tasks.json`

use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DATA_FILE: &str = "tasks.json";
pub const HOME_ENV: &str = "TM_HOME";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
}

impl Settings {
    /// Resolve settings from an explicit database path and the environment,
    /// creating the data directory if needed.
    pub fn resolve(db: Option<&Path>) -> Result<Self> {
        let settings = Self::from_parts(
            db,
            std::env::var_os(HOME_ENV).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        );
        std::fs::create_dir_all(&settings.data_dir)?;
        tracing::debug!(db = %settings.db_path.display(), "resolved data file");
        Ok(settings)
    }

    fn from_parts(db: Option<&Path>, tm_home: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        if let Some(db) = db {
            let data_dir = db
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            return Settings {
                data_dir,
                db_path: db.to_path_buf(),
            };
        }
        let data_dir = tm_home.unwrap_or_else(|| {
            home.unwrap_or_else(|| PathBuf::from("."))
                .join(".tm")
        });
        Settings {
            db_path: data_dir.join(DATA_FILE),
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_db_wins() {
        let s = Settings::from_parts(
            Some(Path::new("/tmp/work/mine.json")),
            Some(PathBuf::from("/elsewhere")),
            Some(PathBuf::from("/home/me")),
        );
        assert_eq!(s.db_path, PathBuf::from("/tmp/work/mine.json"));
        assert_eq!(s.data_dir, PathBuf::from("/tmp/work"));
    }

    #[test]
    fn bare_file_name_lives_in_current_dir() {
        let s = Settings::from_parts(Some(Path::new("tasks.json")), None, None);
        assert_eq!(s.data_dir, PathBuf::from("."));
    }

    #[test]
    fn tm_home_beats_home() {
        let s = Settings::from_parts(
            None,
            Some(PathBuf::from("/data/tm")),
            Some(PathBuf::from("/home/me")),
        );
        assert_eq!(s.db_path, PathBuf::from("/data/tm/tasks.json"));
    }

    #[test]
    fn defaults_to_dot_tm_under_home() {
        let s = Settings::from_parts(None, None, Some(PathBuf::from("/home/me")));
        assert_eq!(s.db_path, PathBuf::from("/home/me/.tm/tasks.json"));
    }
}
