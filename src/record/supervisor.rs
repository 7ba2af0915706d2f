//! Recording supervisor implementation
//!
//! Manages background jobs that pull frames from a source and append
//! multipart units to a file until stopped or a duration elapses. At most
//! one background unit runs per job id; jobs never block each other and
//! fail independently. The job table lock is shared with the blocking
//! recording threads, so it is a `std::sync::Mutex` held only for field
//! updates, never during capture or file I/O.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::capture::{CaptureError, FrameSource};
use crate::stream::{encode_frame, frame_period};

use super::error::RecordError;
use super::job::{JobSummary, RecordingJob};

/// Supervisor for background recording jobs
pub struct RecordingSupervisor {
    jobs: Mutex<HashMap<Uuid, RecordingJob>>,
    recordings_dir: PathBuf,
}

impl RecordingSupervisor {
    /// Create a supervisor writing recordings under `recordings_dir`
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            recordings_dir: recordings_dir.into(),
        }
    }

    /// Start a new recording job and return its id
    ///
    /// Registers the job as running and launches its background unit.
    /// Starting never waits on any previous job. Fails only if the output
    /// directory cannot be created.
    pub fn start(
        self: &Arc<Self>,
        source: Box<dyn FrameSource>,
        fps: u32,
        duration: Option<Duration>,
    ) -> Result<Uuid, RecordError> {
        std::fs::create_dir_all(&self.recordings_dir)?;

        let id = Uuid::new_v4();
        let output_path = self.recordings_dir.join(format!("screen_{}.mpng", id));
        let stop = Arc::new(AtomicBool::new(false));

        let job = RecordingJob {
            fps,
            duration,
            started_at: Utc::now(),
            output_path: output_path.clone(),
            completed: false,
            stop: Arc::clone(&stop),
        };

        {
            let mut jobs = self.jobs.lock().expect("recording lock poisoned");
            jobs.insert(id, job);
        }

        tracing::info!(
            recording_id = %id,
            fps,
            duration_secs = duration.map(|d| d.as_secs()),
            path = %output_path.display(),
            "Recording started"
        );

        let supervisor = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut source = source;
            if let Err(e) = run_record_loop(source.as_mut(), &output_path, fps, duration, &stop) {
                // Not retried: the first I/O or capture failure ends the job.
                tracing::warn!(recording_id = %id, error = %e, "Recording loop failed");
            }
            supervisor.mark_completed(id);
        });

        Ok(id)
    }

    /// Signal a job to stop
    ///
    /// Non-blocking: returns before the background unit observes the signal,
    /// so `list` may briefly still show `completed: false`. Setting an
    /// already-set signal is a no-op, not an error; the job record is
    /// retained, so a second `stop` still finds it.
    pub fn stop(&self, id: Uuid) -> Result<(), RecordError> {
        let jobs = self.jobs.lock().expect("recording lock poisoned");
        let job = jobs.get(&id).ok_or(RecordError::NotFound(id))?;

        job.stop.store(true, Ordering::Relaxed);
        tracing::info!(recording_id = %id, "Recording stop requested");
        Ok(())
    }

    /// Snapshot of all known jobs, running and completed
    pub fn list(&self) -> HashMap<Uuid, JobSummary> {
        let jobs = self.jobs.lock().expect("recording lock poisoned");
        jobs.iter().map(|(id, job)| (*id, job.summary())).collect()
    }

    /// Whether the job's background unit has exited; `None` if unknown
    pub fn is_completed(&self, id: Uuid) -> Option<bool> {
        let jobs = self.jobs.lock().expect("recording lock poisoned");
        jobs.get(&id).map(|job| job.completed)
    }

    fn mark_completed(&self, id: Uuid) {
        let mut jobs = self.jobs.lock().expect("recording lock poisoned");
        if let Some(job) = jobs.get_mut(&id) {
            job.completed = true;
            tracing::info!(recording_id = %id, "Recording completed");
        }
    }
}

/// Capture-and-append loop for one job
///
/// Exits when the stop signal is observed, the duration deadline passes, or
/// the first capture/write error occurs; both checks happen at iteration
/// boundaries, bounding stop latency to one frame period. The file handle is
/// released on every exit path.
fn run_record_loop(
    source: &mut dyn FrameSource,
    path: &Path,
    fps: u32,
    duration: Option<Duration>,
    stop: &AtomicBool,
) -> Result<(), CaptureError> {
    let period = frame_period(fps);
    let deadline = duration.map(|d| Instant::now() + d);

    let mut file = OpenOptions::new().append(true).create(true).open(path)?;

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        let start = Instant::now();
        let frame = source.capture()?;
        file.write_all(&encode_frame(&frame))?;

        if let Some(remaining) = period.checked_sub(start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{ImageFormat, TestPatternSource};

    fn test_source() -> Box<dyn FrameSource> {
        Box::new(TestPatternSource::new(ImageFormat::Png))
    }

    #[tokio::test]
    async fn test_duration_completes_without_stop() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = Arc::new(RecordingSupervisor::new(dir.path()));

        let id = supervisor
            .start(test_source(), 10, Some(Duration::from_millis(200)))
            .unwrap();

        // Immediately after start the job is running
        assert_eq!(supervisor.is_completed(id), Some(false));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(supervisor.is_completed(id), Some(true));

        let jobs = supervisor.list();
        let summary = &jobs[&id];
        assert!(summary.completed);

        // Output is a sequence of boundary-delimited frames
        let data = std::fs::read(&summary.file).unwrap();
        assert!(data.starts_with(b"--frame\r\nContent-Type: image/png"));
    }

    #[tokio::test]
    async fn test_stop_is_cooperative_and_reentrant() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = Arc::new(RecordingSupervisor::new(dir.path()));

        let id = supervisor.start(test_source(), 20, None).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        supervisor.stop(id).unwrap();
        // Second stop on an already-signalled job is a no-op, not an error
        supervisor.stop(id).unwrap();

        // Observed within roughly one frame period
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(supervisor.is_completed(id), Some(true));

        // Completed jobs are retained for inspection
        assert!(supervisor.list().contains_key(&id));
    }

    #[tokio::test]
    async fn test_stop_unknown_job() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = Arc::new(RecordingSupervisor::new(dir.path()));

        assert!(matches!(
            supervisor.stop(Uuid::new_v4()),
            Err(RecordError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_capture_failure_terminates_job() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = Arc::new(RecordingSupervisor::new(dir.path()));

        let source = Box::new(TestPatternSource::new(ImageFormat::Png).fail_after(1));
        let id = supervisor.start(source, 30, None).unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        // The failure ends only this job and it stays listed
        assert_eq!(supervisor.is_completed(id), Some(true));
        let jobs = supervisor.list();
        assert!(jobs[&id].completed);
    }

    #[tokio::test]
    async fn test_concurrent_jobs_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = Arc::new(RecordingSupervisor::new(dir.path()));

        let failing = Box::new(TestPatternSource::new(ImageFormat::Png).fail_after(1));
        let bad = supervisor.start(failing, 30, None).unwrap();
        let good = supervisor.start(test_source(), 30, None).unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(supervisor.is_completed(bad), Some(true));
        assert_eq!(supervisor.is_completed(good), Some(false));

        supervisor.stop(good).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(supervisor.is_completed(good), Some(true));
    }
}
