//! Test pattern frame source
//!
//! Deterministic generated frames for tests and development without capture
//! hardware. A moving gradient makes consecutive frames distinguishable.

use bytes::Bytes;
use image::{ImageBuffer, Rgb};
use std::io::Cursor;

use super::error::CaptureError;
use super::source::{EncodedFrame, FrameSource, ImageFormat};

/// Frame source producing a small generated gradient
pub struct TestPatternSource {
    format: ImageFormat,
    width: u32,
    height: u32,
    frame_index: u64,
    fail_after: Option<u64>,
}

impl TestPatternSource {
    /// Create a test source producing the given format
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            width: 64,
            height: 48,
            frame_index: 0,
            fail_after: None,
        }
    }

    /// Fail with `SourceUnavailable` after producing `n` frames
    pub fn fail_after(mut self, n: u64) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Number of frames produced so far
    pub fn frames_produced(&self) -> u64 {
        self.frame_index
    }
}

impl FrameSource for TestPatternSource {
    fn format(&self) -> ImageFormat {
        self.format
    }

    fn capture(&mut self) -> Result<EncodedFrame, CaptureError> {
        if let Some(limit) = self.fail_after {
            if self.frame_index >= limit {
                return Err(CaptureError::SourceUnavailable(
                    "test source exhausted".into(),
                ));
            }
        }

        let phase = (self.frame_index % 256) as u8;
        let img = ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Rgb([
                (x * 255 / self.width) as u8,
                (y * 255 / self.height) as u8,
                phase,
            ])
        });

        let target = match self.format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        };

        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, target)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;

        self.frame_index += 1;
        Ok(EncodedFrame {
            format: self.format,
            data: Bytes::from(buf.into_inner()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produces_valid_png() {
        let mut source = TestPatternSource::new(ImageFormat::Png);
        let frame = source.capture().unwrap();

        assert_eq!(frame.format, ImageFormat::Png);
        // PNG magic
        assert_eq!(&frame.data[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_produces_valid_jpeg() {
        let mut source = TestPatternSource::new(ImageFormat::Jpeg);
        let frame = source.capture().unwrap();

        assert_eq!(frame.format, ImageFormat::Jpeg);
        // JPEG SOI marker
        assert_eq!(&frame.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_fail_after() {
        let mut source = TestPatternSource::new(ImageFormat::Png).fail_after(2);

        assert!(source.capture().is_ok());
        assert!(source.capture().is_ok());
        assert!(matches!(
            source.capture(),
            Err(CaptureError::SourceUnavailable(_))
        ));
    }
}
