//! Request and response models
//!
//! Wire shapes mirror the upstream service: snake_case JSON fields and a
//! `{"detail": ...}` error envelope. Range checks run in `validate()` before
//! any side effect.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::JobSummary;
use crate::services::{MouseButton, PowerAction, VolumeAction};
use crate::session::SessionTicket;

use super::error::ApiError;

/// Session TTL bounds in seconds
pub const SESSION_TIMEOUT_RANGE: (u64, u64) = (30, 86_400);
/// Frame rate bounds for streaming and recording
pub const FPS_RANGE: (u32, u32) = (1, 30);
/// JPEG quality bounds for camera streams
pub const QUALITY_RANGE: (u8, u8) = (30, 95);

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::Validation(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(())
}

// --- shared responses ---

/// Plain `{"status": "ok"}` acknowledgement
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

// --- auth ---

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub token: String,
}

// --- sessions ---

fn default_session_timeout() -> u64 {
    900
}

#[derive(Debug, Deserialize)]
pub struct SessionStartRequest {
    pub client_name: Option<String>,
    #[serde(default = "default_session_timeout")]
    pub timeout_seconds: u64,
}

impl SessionStartRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let (min, max) = SESSION_TIMEOUT_RANGE;
        check_range("timeout_seconds", self.timeout_seconds, min, max)
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionIdRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionTicketResponse {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionTicket> for SessionTicketResponse {
    fn from(ticket: SessionTicket) -> Self {
        Self {
            session_id: ticket.session_id,
            expires_at: ticket.expires_at,
        }
    }
}

// --- input ---

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct MouseMoveRequest {
    pub x: i32,
    pub y: i32,
    /// Accepted for wire compatibility; the pointer jumps immediately
    #[serde(default)]
    pub duration: f64,
    #[serde(default = "default_true")]
    pub absolute: bool,
}

impl MouseMoveRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_range("duration", self.duration, 0.0, 10.0)
    }
}

fn default_button() -> MouseButton {
    MouseButton::Left
}

fn default_one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct MouseClickRequest {
    #[serde(default = "default_button")]
    pub button: MouseButton,
    #[serde(default = "default_one")]
    pub clicks: u32,
    #[serde(default)]
    pub interval: f64,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl MouseClickRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_range("clicks", self.clicks, 1, 3)?;
        check_range("interval", self.interval, 0.0, 5.0)?;
        if self.x.is_some() != self.y.is_some() {
            return Err(ApiError::Validation(
                "Provide both 'x' and 'y', or neither.".into(),
            ));
        }
        Ok(())
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }
}

#[derive(Debug, Deserialize)]
pub struct KeyboardPressRequest {
    pub key: Option<String>,
    pub keys: Option<Vec<String>>,
    #[serde(default = "default_one")]
    pub presses: u32,
    #[serde(default)]
    pub interval: f64,
}

impl KeyboardPressRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let has_keys = self.keys.as_ref().is_some_and(|k| !k.is_empty());
        if !has_keys && self.key.is_none() {
            return Err(ApiError::Validation("Provide either 'key' or 'keys'.".into()));
        }
        check_range("presses", self.presses, 1, 10)?;
        check_range("interval", self.interval, 0.0, 2.0)
    }
}

// --- system ---

#[derive(Debug, Deserialize)]
pub struct SystemVolumeRequest {
    pub action: VolumeAction,
    #[serde(default = "default_one")]
    pub steps: u32,
}

impl SystemVolumeRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_range("steps", self.steps, 1, 20)
    }
}

#[derive(Debug, Deserialize)]
pub struct SystemLaunchRequest {
    pub command: String,
    pub args: Option<Vec<String>>,
}

impl SystemLaunchRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.command.trim().is_empty() {
            return Err(ApiError::Validation("'command' must not be empty.".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SystemPowerRequest {
    pub action: PowerAction,
}

#[derive(Debug, Serialize)]
pub struct PowerResponse {
    pub status: &'static str,
    pub action: &'static str,
}

// --- streaming ---

fn default_stream_fps() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct ScreenStreamQuery {
    #[serde(default = "default_stream_fps")]
    pub fps: u32,
}

impl ScreenStreamQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        let (min, max) = FPS_RANGE;
        check_range("fps", self.fps, min, max)
    }
}

fn default_quality() -> u8 {
    80
}

#[derive(Debug, Deserialize)]
pub struct CameraStreamQuery {
    #[serde(default = "default_stream_fps")]
    pub fps: u32,
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub device_index: u32,
}

impl CameraStreamQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        let (fps_min, fps_max) = FPS_RANGE;
        check_range("fps", self.fps, fps_min, fps_max)?;
        let (q_min, q_max) = QUALITY_RANGE;
        check_range("quality", self.quality, q_min, q_max)?;
        check_range("device_index", self.device_index, 0, 10)
    }
}

#[derive(Debug, Deserialize)]
pub struct CameraPhotoQuery {
    #[serde(default)]
    pub device_index: u32,
}

impl CameraPhotoQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_range("device_index", self.device_index, 0, 10)
    }
}

// --- recording ---

fn default_record_fps() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ScreenRecordStartRequest {
    #[serde(default = "default_record_fps")]
    pub fps: u32,
    pub duration_seconds: Option<u64>,
}

impl ScreenRecordStartRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let (min, max) = FPS_RANGE;
        check_range("fps", self.fps, min, max)?;
        if let Some(duration) = self.duration_seconds {
            check_range("duration_seconds", duration, 1, 86_400)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RecordStartResponse {
    pub status: &'static str,
    pub recording_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecordStopResponse {
    pub status: &'static str,
    pub recording_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecordingsResponse {
    pub recordings: HashMap<Uuid, JobSummary>,
}
