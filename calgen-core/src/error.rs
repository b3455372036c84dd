//! Error types for calgen.

use thiserror::Error;

/// Errors raised by calgen itself, as opposed to transport failures
/// coming back from the calendar service.
#[derive(Error, Debug)]
pub enum CalgenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Events file error: {0}")]
    EventsFile(String),

    #[error("Invalid event at index {index}: {reason}")]
    InvalidDescriptor { index: usize, reason: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Time error: {0}")]
    Time(String),

    #[error("Failed to delete {failed} event(s).")]
    DeleteFailed { failed: usize },
}

/// Result type alias for calgen operations.
pub type CalgenResult<T> = Result<T, CalgenError>;
