//! PC remote control server
//!
//! Exposes a remote-control surface over HTTP: a client authenticates with a
//! shared-secret token and then simulates input, reads system status, and
//! streams or records the screen and camera of the host machine. A UDP
//! responder answers LAN discovery probes with connection info.
//!
//! # Architecture
//!
//! ```text
//!   axum router (api)
//!      │ bearer token middleware
//!      ├──► SessionRegistry ◄── sweep task (30s interval)
//!      ├──► RecordingSupervisor ──► blocking job loops ──► .mpng files
//!      ├──► spawn_frame_stream ──► multipart HTTP body
//!      └──► delegated services (input, system, launch, power)
//!
//!   DiscoveryResponder — independent UDP loop, process lifetime
//! ```
//!
//! Live streams and recording files share the same boundary framing, so a
//! recording is replayable by any consumer of the live protocol.

pub mod api;
pub mod capture;
pub mod config;
pub mod discovery;
pub mod record;
pub mod services;
pub mod session;
pub mod stream;

pub use api::{router, AppState};
pub use capture::{CameraSource, CaptureError, EncodedFrame, FrameSource, ImageFormat, ScreenSource};
pub use config::ServerConfig;
pub use discovery::{DiscoveryResponder, DISCOVERY_PORT, DISCOVERY_PROBE};
pub use record::{RecordError, RecordingSupervisor};
pub use session::{SessionError, SessionRegistry, SessionTicket};
