//! Recording job state

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// State for a single recording job
///
/// Owned exclusively by the supervisor; the background loop only touches the
/// stop flag and reports completion back through the supervisor.
#[derive(Debug)]
pub struct RecordingJob {
    /// Target frame rate
    pub fps: u32,
    /// Optional hard stop; `None` runs until stopped
    pub duration: Option<Duration>,
    /// Wall-clock start time
    pub started_at: DateTime<Utc>,
    /// Destination file for the appended frame stream
    pub output_path: PathBuf,
    /// Set exactly once when the background loop exits, for any reason
    pub completed: bool,
    /// Cooperative stop signal, observed once per loop iteration
    pub(super) stop: Arc<AtomicBool>,
}

/// Snapshot of a job's metadata for listing
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    /// Wall-clock start time
    pub started_at: DateTime<Utc>,
    /// Target frame rate
    pub fps: u32,
    /// Requested duration in seconds, if any
    pub duration_seconds: Option<u64>,
    /// Whether the background loop has exited
    pub completed: bool,
    /// Output file path
    pub file: String,
}

impl RecordingJob {
    pub(super) fn summary(&self) -> JobSummary {
        JobSummary {
            started_at: self.started_at,
            fps: self.fps,
            duration_seconds: self.duration.map(|d| d.as_secs()),
            completed: self.completed,
            file: self.output_path.display().to_string(),
        }
    }
}
