//! Frame source abstraction
//!
//! A frame source yields one encoded image per call. Raw pixel buffers never
//! cross this boundary; only the compressed bytes do.

use bytes::Bytes;

use super::error::CaptureError;

/// Image format produced by a frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG (screen capture)
    Png,
    /// JPEG (camera capture)
    Jpeg,
}

impl ImageFormat {
    /// MIME type for HTTP responses and multipart parts
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// A single captured frame, already encoded
///
/// Cheap to clone due to `Bytes` reference counting.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Encoded image format
    pub format: ImageFormat,
    /// Encoded image bytes
    pub data: Bytes,
}

/// A capability that yields one encoded image on demand
///
/// Capture is blocking; callers run it on a blocking thread. Handles are
/// acquired per source instance and never shared across concurrent streams.
pub trait FrameSource: Send {
    /// The image format this source produces
    fn format(&self) -> ImageFormat;

    /// Grab and encode one frame
    fn capture(&mut self) -> Result<EncodedFrame, CaptureError>;
}
