//! Session lifecycle tracking
//!
//! Sessions are time-bounded authorization contexts tracked server-side,
//! independent of the per-request bearer token. The registry enforces TTLs
//! lazily on touch and eagerly through a periodic sweep task.

pub mod error;
pub mod registry;

pub use error::SessionError;
pub use registry::{Session, SessionRegistry, SessionTicket};
