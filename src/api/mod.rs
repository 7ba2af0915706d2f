//! HTTP control surface
//!
//! One axum router over the core components (sessions, streaming,
//! recording) and the delegated OS services. All routes except `/auth` and
//! `/health` require the shared-secret bearer token.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::config::ServerConfig;
use crate::record::RecordingSupervisor;
use crate::services::InputController;
use crate::session::SessionRegistry;

pub use error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<SessionRegistry>,
    pub recordings: Arc<RecordingSupervisor>,
    pub input: InputController,
}

impl AppState {
    /// Build the state graph from a config
    pub fn new(config: ServerConfig) -> Self {
        let recordings = RecordingSupervisor::new(config.recordings_dir.clone());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionRegistry::new()),
            recordings: Arc::new(recordings),
            input: InputController::new(),
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let open = Router::new()
        .route("/auth", post(handlers::auth))
        .route("/health", get(handlers::health));

    let protected = Router::new()
        .route("/session/start", post(handlers::session_start))
        .route("/session/heartbeat", post(handlers::session_heartbeat))
        .route("/session/end", post(handlers::session_end))
        .route("/session/status/{session_id}", get(handlers::session_status))
        .route("/mouse/move", post(handlers::mouse_move))
        .route("/mouse/click", post(handlers::mouse_click))
        .route("/keyboard/press", post(handlers::keyboard_press))
        .route("/system/volume", post(handlers::system_volume))
        .route("/system/launch", post(handlers::system_launch))
        .route("/system/status", get(handlers::system_status))
        .route("/system/power", post(handlers::system_power))
        .route("/screen/screenshot", get(handlers::screen_screenshot))
        .route("/screen/stream", get(handlers::screen_stream))
        .route("/screen/record/start", post(handlers::screen_record_start))
        .route(
            "/screen/record/stop/{recording_id}",
            post(handlers::screen_record_stop),
        )
        .route("/screen/recordings", get(handlers::screen_recordings))
        .route("/camera/stream", get(handlers::camera_stream))
        .route("/camera/photo", get(handlers::camera_photo))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    open.merge(protected).with_state(state)
}
