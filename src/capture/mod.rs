//! Frame capture sources
//!
//! A [`FrameSource`] yields one encoded image per call: PNG for the screen,
//! JPEG for cameras. Sources are consumed by single-shot handlers, the live
//! stream encoder, and the recording supervisor. Capture goes through
//! external platform tools spawned per grab, plus a generated test source
//! for development without hardware.

pub mod camera;
pub mod error;
pub mod screen;
pub mod source;

#[cfg(any(test, feature = "test-source"))]
pub mod test_pattern;

pub use camera::CameraSource;
pub use error::CaptureError;
pub use screen::ScreenSource;
pub use source::{EncodedFrame, FrameSource, ImageFormat};

#[cfg(any(test, feature = "test-source"))]
pub use test_pattern::TestPatternSource;
