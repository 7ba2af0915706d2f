//! Capture error types

/// Error type for frame capture operations
#[derive(Debug)]
pub enum CaptureError {
    /// The capture device or tool is missing, busy, or refused the grab
    SourceUnavailable(String),
    /// The raw frame could not be encoded to the target image format
    Encode(String),
    /// I/O failure while talking to the capture backend
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::SourceUnavailable(msg) => write!(f, "Capture source unavailable: {}", msg),
            CaptureError::Encode(msg) => write!(f, "Frame encode failed: {}", msg),
            CaptureError::Io(e) => write!(f, "Capture I/O error: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(e: std::io::Error) -> Self {
        CaptureError::Io(e)
    }
}
