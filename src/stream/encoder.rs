//! Live stream encoder
//!
//! Pulls frames from a [`FrameSource`] at a target rate and emits
//! boundary-delimited multipart units. Capture is blocking, so the producer
//! loop runs on a blocking thread and hands parts to the async side through
//! a small bounded channel; a closed channel means the consumer disconnected
//! and stops the producer, releasing the source.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::capture::{CaptureError, FrameSource};

use super::multipart;

/// Channel depth between producer and HTTP body; small so a slow consumer
/// backpressures the producer instead of buffering frames.
const STREAM_CHANNEL_CAPACITY: usize = 2;

/// Target period for one frame at the given rate
pub fn frame_period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

/// Start producing multipart frame units from `source` at `fps`
///
/// The returned receiver yields one `Ok(Bytes)` per delimited unit. The
/// producer stops on the first capture or encode failure, delivering the
/// error as the final item, or as soon as the receiver is dropped. Pacing is
/// best effort: if capture plus encode exceeds the frame period the loop
/// never sleeps and never drops frames.
pub fn spawn_frame_stream(
    mut source: Box<dyn FrameSource>,
    fps: u32,
) -> mpsc::Receiver<Result<Bytes, CaptureError>> {
    let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    let period = frame_period(fps);

    tokio::task::spawn_blocking(move || {
        loop {
            let start = Instant::now();

            let part = match source.capture() {
                Ok(frame) => multipart::encode_frame(&frame),
                Err(e) => {
                    tracing::debug!(error = %e, "Frame capture failed, ending stream");
                    let _ = tx.blocking_send(Err(e));
                    return;
                }
            };

            if tx.blocking_send(Ok(part)).is_err() {
                tracing::debug!("Stream consumer disconnected");
                return;
            }

            if let Some(remaining) = period.checked_sub(start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{ImageFormat, TestPatternSource};

    #[test]
    fn test_frame_period() {
        assert_eq!(frame_period(10), Duration::from_millis(100));
        assert_eq!(frame_period(1), Duration::from_secs(1));
        // Zero is clamped rather than dividing by zero
        assert_eq!(frame_period(0), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_stream_emits_delimited_units() {
        let source = TestPatternSource::new(ImageFormat::Png);
        let mut rx = spawn_frame_stream(Box::new(source), 30);

        for _ in 0..3 {
            let part = rx.recv().await.expect("stream alive").expect("frame ok");
            assert!(part.starts_with(b"--frame\r\nContent-Type: image/png\r\n\r\n"));
            assert!(part.ends_with(b"\r\n"));
        }
    }

    #[tokio::test]
    async fn test_source_failure_terminates_stream() {
        let source = TestPatternSource::new(ImageFormat::Jpeg).fail_after(2);
        let mut rx = spawn_frame_stream(Box::new(source), 30);

        assert!(rx.recv().await.unwrap().is_ok());
        assert!(rx.recv().await.unwrap().is_ok());
        assert!(matches!(
            rx.recv().await,
            Some(Err(CaptureError::SourceUnavailable(_)))
        ));
        // Producer exits after delivering the error
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_receiver_stops_producer() {
        let source = TestPatternSource::new(ImageFormat::Png);
        let mut rx = spawn_frame_stream(Box::new(source), 30);

        let _ = rx.recv().await.unwrap().unwrap();
        drop(rx);
        // Nothing to assert directly; the producer observes the closed
        // channel on its next send and returns without panicking.
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
