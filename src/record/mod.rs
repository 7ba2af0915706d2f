//! Supervised screen recording
//!
//! Recording jobs run as independent background units, each appending
//! boundary-delimited frames to its own file. Files use the same framing as
//! the live stream, so a recording is a raw concatenation of self-delimited
//! image frames rather than a container format.

pub mod error;
pub mod job;
pub mod supervisor;

pub use error::RecordError;
pub use job::{JobSummary, RecordingJob};
pub use supervisor::RecordingSupervisor;
