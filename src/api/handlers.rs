//! Request handlers
//!
//! Thin dispatch from HTTP into the core components and delegated services.
//! Blocking work (capture, input tools, `/proc` sampling) runs on blocking
//! threads so handler futures never stall the runtime.

use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::Response;
use axum::Json;
use bytes::Bytes;
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::capture::{CameraSource, CaptureError, FrameSource, ScreenSource};
use crate::services;
use crate::services::SystemStatus;
use crate::stream::{spawn_frame_stream, stream_content_type};

use super::error::ApiError;
use super::models::*;
use super::AppState;

fn internal<E: std::fmt::Display>(e: E) -> ApiError {
    ApiError::Internal(e.to_string())
}

/// Unknown and malformed ids both read as "not found"
fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Session not found.".into()))
}

fn parse_recording_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Recording not found.".into()))
}

/// Run a blocking delegation on a worker thread
async fn run_blocking<T, E, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(internal)?
        .map_err(Into::into)
}

// --- auth & health ---

pub(super) async fn auth(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let is_valid = req.token == state.config.api_token;
    tracing::info!(success = is_valid, "Auth attempt");
    if !is_valid {
        return Err(ApiError::Unauthorized);
    }
    Ok(Json(StatusResponse::ok()))
}

pub(super) async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

// --- sessions ---

pub(super) async fn session_start(
    State(state): State<AppState>,
    Json(req): Json<SessionStartRequest>,
) -> Result<Json<SessionTicketResponse>, ApiError> {
    req.validate()?;
    let ticket = state
        .sessions
        .create(req.client_name, Duration::from_secs(req.timeout_seconds));
    Ok(Json(ticket.into()))
}

pub(super) async fn session_heartbeat(
    State(state): State<AppState>,
    Json(req): Json<SessionIdRequest>,
) -> Result<Json<SessionTicketResponse>, ApiError> {
    let id = parse_session_id(&req.session_id)?;
    let ticket = state.sessions.touch(id)?;
    Ok(Json(ticket.into()))
}

pub(super) async fn session_end(
    State(state): State<AppState>,
    Json(req): Json<SessionIdRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_session_id(&req.session_id)?;
    state.sessions.end(id)?;
    Ok(Json(StatusResponse::ok()))
}

pub(super) async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionTicketResponse>, ApiError> {
    let id = parse_session_id(&session_id)?;
    // Status checks refresh liveness, same as a heartbeat
    let ticket = state.sessions.touch(id)?;
    Ok(Json(ticket.into()))
}

// --- input ---

pub(super) async fn mouse_move(
    State(state): State<AppState>,
    Json(req): Json<MouseMoveRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    req.validate()?;
    tracing::info!(x = req.x, y = req.y, absolute = req.absolute, "Mouse move");
    let input = state.input;
    run_blocking(move || input.move_mouse(req.x, req.y, req.absolute)).await?;
    Ok(Json(StatusResponse::ok()))
}

pub(super) async fn mouse_click(
    State(state): State<AppState>,
    Json(req): Json<MouseClickRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    req.validate()?;
    tracing::info!(button = ?req.button, clicks = req.clicks, "Mouse click");
    let input = state.input;
    run_blocking(move || input.click(req.button, req.clicks, req.interval, req.position())).await?;
    Ok(Json(StatusResponse::ok()))
}

pub(super) async fn keyboard_press(
    State(state): State<AppState>,
    Json(req): Json<KeyboardPressRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    req.validate()?;
    tracing::info!(key = ?req.key, keys = ?req.keys, "Keyboard press");
    let input = state.input;
    run_blocking(move || {
        // A hotkey list takes precedence over a single key
        if let Some(keys) = req.keys.filter(|k| !k.is_empty()) {
            input.hotkey(&keys)
        } else {
            let key = req.key.unwrap_or_default();
            input.press_key(&key, req.presses, req.interval)
        }
    })
    .await?;
    Ok(Json(StatusResponse::ok()))
}

// --- system ---

pub(super) async fn system_volume(
    State(state): State<AppState>,
    Json(req): Json<SystemVolumeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    req.validate()?;
    tracing::info!(action = ?req.action, steps = req.steps, "Volume control");
    let input = state.input;
    run_blocking(move || input.volume(req.action, req.steps)).await?;
    Ok(Json(StatusResponse::ok()))
}

pub(super) async fn system_launch(
    State(_state): State<AppState>,
    Json(req): Json<SystemLaunchRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    req.validate()?;
    let args = req.args.unwrap_or_default();
    run_blocking(move || services::launch(&req.command, &args)).await?;
    Ok(Json(StatusResponse::ok()))
}

pub(super) async fn system_status() -> Result<Json<SystemStatus>, ApiError> {
    tracing::info!("Status request");
    let status = run_blocking(services::system_status).await?;
    Ok(Json(status))
}

pub(super) async fn system_power(
    State(_state): State<AppState>,
    Json(req): Json<SystemPowerRequest>,
) -> Result<Json<PowerResponse>, ApiError> {
    run_blocking(move || services::run_power_action(req.action)).await?;
    Ok(Json(PowerResponse {
        status: "ok",
        action: req.action.as_str(),
    }))
}

// --- single-shot capture ---

fn image_response(format: crate::capture::ImageFormat, data: Bytes) -> Result<Response, ApiError> {
    Response::builder()
        .header(header::CONTENT_TYPE, format.mime())
        .body(Body::from(data))
        .map_err(internal)
}

pub(super) async fn screen_screenshot() -> Result<Response, ApiError> {
    tracing::info!("Screenshot request");
    let frame = run_blocking(move || ScreenSource::new().capture()).await?;
    image_response(frame.format, frame.data)
}

pub(super) async fn camera_photo(
    Query(query): Query<CameraPhotoQuery>,
) -> Result<Response, ApiError> {
    query.validate()?;
    tracing::info!(device = query.device_index, "Camera photo request");
    let frame =
        run_blocking(move || CameraSource::new(query.device_index, 90).capture()).await?;
    image_response(frame.format, frame.data)
}

// --- live streaming ---

/// Start a producer for `source` and wrap it in a multipart response
///
/// The first frame is awaited before responding so capture failures surface
/// as a proper error status instead of a broken stream.
async fn serve_stream(source: Box<dyn FrameSource>, fps: u32) -> Result<Response, ApiError> {
    let mut rx = spawn_frame_stream(source, fps);

    let first = match rx.recv().await {
        Some(Ok(part)) => part,
        Some(Err(e)) => return Err(e.into()),
        None => return Err(ApiError::Internal("stream producer exited".into())),
    };

    let rest = ReceiverStream::new(rx);
    let body = Body::from_stream(
        futures::stream::once(async move { Ok::<Bytes, CaptureError>(first) }).chain(rest),
    );

    Response::builder()
        .header(header::CONTENT_TYPE, stream_content_type())
        .body(body)
        .map_err(internal)
}

pub(super) async fn screen_stream(
    Query(query): Query<ScreenStreamQuery>,
) -> Result<Response, ApiError> {
    query.validate()?;
    tracing::info!(fps = query.fps, "Screen stream request");
    serve_stream(Box::new(ScreenSource::new()), query.fps).await
}

pub(super) async fn camera_stream(
    Query(query): Query<CameraStreamQuery>,
) -> Result<Response, ApiError> {
    query.validate()?;
    tracing::info!(
        fps = query.fps,
        quality = query.quality,
        device = query.device_index,
        "Camera stream request"
    );
    let source = CameraSource::new(query.device_index, query.quality);
    serve_stream(Box::new(source), query.fps).await
}

// --- recording ---

pub(super) async fn screen_record_start(
    State(state): State<AppState>,
    Json(req): Json<ScreenRecordStartRequest>,
) -> Result<Json<RecordStartResponse>, ApiError> {
    req.validate()?;
    let duration = req.duration_seconds.map(Duration::from_secs);
    let recording_id = state
        .recordings
        .start(Box::new(ScreenSource::new()), req.fps, duration)?;
    Ok(Json(RecordStartResponse {
        status: "ok",
        recording_id,
    }))
}

pub(super) async fn screen_record_stop(
    State(state): State<AppState>,
    Path(recording_id): Path<String>,
) -> Result<Json<RecordStopResponse>, ApiError> {
    let id = parse_recording_id(&recording_id)?;
    state.recordings.stop(id)?;
    Ok(Json(RecordStopResponse {
        status: "ok",
        recording_id: id,
    }))
}

pub(super) async fn screen_recordings(
    State(state): State<AppState>,
) -> Json<RecordingsResponse> {
    Json(RecordingsResponse {
        recordings: state.recordings.list(),
    })
}
