//! Live frame streaming
//!
//! The streaming protocol used for screen and camera feeds: each frame is
//! wrapped in a multipart boundary unit and emitted at a best-effort rate.
//! Recording files reuse the same framing, so a recording is replayable by
//! any consumer that understands the live stream.

pub mod encoder;
pub mod multipart;

pub use encoder::{frame_period, spawn_frame_stream};
pub use multipart::{encode_frame, encode_part, stream_content_type, BOUNDARY};
