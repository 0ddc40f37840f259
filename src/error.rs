//! Error types for the task manager.
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown task)
//! - 4: Operation failed (I/O, corrupt data file)

use thiserror::Error;

/// Exit codes for the `tm` binary.
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for task manager operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Task not found with ID: {0}")]
    NotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for building a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::NotFound(_) => exit_codes::USER_ERROR,
            Error::Io(_) | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for task manager operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_exit_code_two() {
        assert_eq!(Error::NotFound(7).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(
            Error::validation("bad priority").exit_code(),
            exit_codes::USER_ERROR
        );
    }

    #[test]
    fn io_errors_map_to_operation_failed() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    }

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(Error::NotFound(42).to_string(), "Task not found with ID: 42");
    }
}
