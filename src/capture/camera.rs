//! Camera frame source
//!
//! Grabs single JPEG frames from an indexed camera device via `ffmpeg`.
//! The device handle is opened per grab; if the device cannot be shared the
//! second concurrent open surfaces as `SourceUnavailable`, matching the
//! per-call acquisition contract.

use bytes::Bytes;
use std::process::Command;

use super::error::CaptureError;
use super::source::{EncodedFrame, FrameSource, ImageFormat};

/// Camera capture source producing JPEG frames
#[derive(Debug)]
pub struct CameraSource {
    device_index: u32,
    quality: u8,
}

impl CameraSource {
    /// Create a camera source for the given device index
    ///
    /// `quality` is a JPEG quality in [30, 95]; callers validate the range.
    pub fn new(device_index: u32, quality: u8) -> Self {
        Self {
            device_index,
            quality,
        }
    }

    /// Map JPEG quality (30..=95, higher is better) to ffmpeg `-q:v`
    /// (2..=31, lower is better).
    fn ffmpeg_qscale(&self) -> u32 {
        let q = self.quality.clamp(30, 95) as u32;
        2 + (95 - q) * 29 / 65
    }

    fn input_args(&self) -> (String, Vec<String>) {
        #[cfg(target_os = "linux")]
        {
            (
                format!("/dev/video{}", self.device_index),
                vec!["-f".into(), "v4l2".into()],
            )
        }
        #[cfg(target_os = "macos")]
        {
            (
                format!("{}", self.device_index),
                vec!["-f".into(), "avfoundation".into()],
            )
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            (
                format!("{}", self.device_index),
                vec!["-f".into(), "vfwcap".into()],
            )
        }
    }
}

impl FrameSource for CameraSource {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn capture(&mut self) -> Result<EncodedFrame, CaptureError> {
        let (input, demuxer_args) = self.input_args();

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error"])
            .args(&demuxer_args)
            .args(["-i", &input])
            .args(["-frames:v", "1"])
            .args(["-q:v", &self.ffmpeg_qscale().to_string()])
            .args(["-f", "image2", "-"])
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptureError::SourceUnavailable("camera capture requires ffmpeg".into())
                } else {
                    CaptureError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::SourceUnavailable(format!(
                "camera device {} not available: {}",
                self.device_index,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(CaptureError::SourceUnavailable(format!(
                "camera device {} produced no frame",
                self.device_index
            )));
        }

        Ok(EncodedFrame {
            format: ImageFormat::Jpeg,
            data: Bytes::from(output.stdout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qscale_mapping() {
        // Best quality maps to the lowest (best) qscale
        assert_eq!(CameraSource::new(0, 95).ffmpeg_qscale(), 2);
        // Worst quality maps to the highest qscale
        assert_eq!(CameraSource::new(0, 30).ffmpeg_qscale(), 31);
        // Out-of-range input is clamped, not propagated
        assert_eq!(CameraSource::new(0, 100).ffmpeg_qscale(), 2);
        assert_eq!(CameraSource::new(0, 0).ffmpeg_qscale(), 31);
    }
}
