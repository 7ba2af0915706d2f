//! Delegated OS services
//!
//! Stateless collaborators the HTTP layer dispatches into: input simulation,
//! system status, process launching, and power control. Each call is a
//! one-shot delegation with no retained state; platform gaps surface as
//! `ServiceError::Unsupported` rather than late failures.

pub mod error;
pub mod input;
pub mod launcher;
pub mod power;
pub mod system;

pub use error::ServiceError;
pub use input::{InputController, MouseButton, VolumeAction};
pub use launcher::launch;
pub use power::{run_power_action, PowerAction};
pub use system::{system_status, MemoryStatus, SystemStatus};
