//! Recording error types

use uuid::Uuid;

/// Error type for recording supervisor operations
#[derive(Debug)]
pub enum RecordError {
    /// Recording id is not in the job table
    NotFound(Uuid),
    /// Failed to prepare the output location
    Io(std::io::Error),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::NotFound(id) => write!(f, "Recording not found: {}", id),
            RecordError::Io(e) => write!(f, "Recording I/O error: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<std::io::Error> for RecordError {
    fn from(e: std::io::Error) -> Self {
        RecordError::Io(e)
    }
}
