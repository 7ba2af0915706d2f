//! Service error types

/// Error type for delegated OS service operations
#[derive(Debug)]
pub enum ServiceError {
    /// Action is not available on this platform
    Unsupported(&'static str),
    /// The requested program does not exist
    MissingBinary(String),
    /// A required helper tool is not installed or not reachable
    Unavailable(String),
    /// The underlying command ran but failed
    Backend(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Unsupported(msg) => write!(f, "Unsupported on this platform: {}", msg),
            ServiceError::MissingBinary(cmd) => write!(f, "No such command: {}", cmd),
            ServiceError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ServiceError::Backend(msg) => write!(f, "Service command failed: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}
