//! Session error types

use uuid::Uuid;

/// Error type for session registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session id is not in the registry
    NotFound(Uuid),
    /// Session outlived its TTL; the entry has been removed
    Expired(Uuid),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotFound(id) => write!(f, "Session not found: {}", id),
            SessionError::Expired(id) => write!(f, "Session expired: {}", id),
        }
    }
}

impl std::error::Error for SessionError {}
