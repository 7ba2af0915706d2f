//! Input simulation service
//!
//! Stateless delegation to the platform input tool (`xdotool` on Linux).
//! Every call shells out once; there is no retained device handle. Platforms
//! without a wired tool report `Unsupported` up front instead of failing
//! deep in a call stack.

use serde::Deserialize;

use super::error::ServiceError;

/// Mouse button selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// X11 button number used by xdotool
    fn x11_button(&self) -> &'static str {
        match self {
            MouseButton::Left => "1",
            MouseButton::Middle => "2",
            MouseButton::Right => "3",
        }
    }
}

/// Volume action delivered through media keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeAction {
    Up,
    Down,
    Mute,
}

impl VolumeAction {
    fn media_key(&self) -> &'static str {
        match self {
            VolumeAction::Up => "XF86AudioRaiseVolume",
            VolumeAction::Down => "XF86AudioLowerVolume",
            VolumeAction::Mute => "XF86AudioMute",
        }
    }
}

/// Map common client key names to X keysyms; unknown names pass through
fn keysym(key: &str) -> String {
    match key {
        "enter" | "return" => "Return".into(),
        "esc" | "escape" => "Escape".into(),
        "backspace" => "BackSpace".into(),
        "tab" => "Tab".into(),
        "space" => "space".into(),
        "delete" | "del" => "Delete".into(),
        "up" => "Up".into(),
        "down" => "Down".into(),
        "left" => "Left".into(),
        "right" => "Right".into(),
        "home" => "Home".into(),
        "end" => "End".into(),
        "pageup" => "Page_Up".into(),
        "pagedown" => "Page_Down".into(),
        "win" | "super" => "super".into(),
        other => other.into(),
    }
}

/// Stateless input controller
#[derive(Debug, Clone, Copy, Default)]
pub struct InputController;

impl InputController {
    pub fn new() -> Self {
        Self
    }

    /// Move the pointer, absolutely or relative to its current position
    pub fn move_mouse(&self, x: i32, y: i32, absolute: bool) -> Result<(), ServiceError> {
        if absolute {
            self.run(&["mousemove", "--", &x.to_string(), &y.to_string()])
        } else {
            self.run(&["mousemove_relative", "--", &x.to_string(), &y.to_string()])
        }
    }

    /// Click a button, optionally after moving to `at`
    pub fn click(
        &self,
        button: MouseButton,
        clicks: u32,
        interval_secs: f64,
        at: Option<(i32, i32)>,
    ) -> Result<(), ServiceError> {
        if let Some((x, y)) = at {
            self.move_mouse(x, y, true)?;
        }
        let delay_ms = (interval_secs * 1000.0) as u64;
        self.run(&[
            "click",
            "--repeat",
            &clicks.to_string(),
            "--delay",
            &delay_ms.to_string(),
            button.x11_button(),
        ])
    }

    /// Press a single key one or more times
    pub fn press_key(&self, key: &str, presses: u32, interval_secs: f64) -> Result<(), ServiceError> {
        let delay_ms = (interval_secs * 1000.0) as u64;
        self.run(&[
            "key",
            "--repeat",
            &presses.to_string(),
            "--repeat-delay",
            &delay_ms.to_string(),
            &keysym(key),
        ])
    }

    /// Press a key combination simultaneously
    pub fn hotkey(&self, keys: &[String]) -> Result<(), ServiceError> {
        let combo: Vec<String> = keys.iter().map(|k| keysym(k)).collect();
        self.run(&["key", &combo.join("+")])
    }

    /// Deliver a volume action as repeated media key presses
    pub fn volume(&self, action: VolumeAction, steps: u32) -> Result<(), ServiceError> {
        for _ in 0..steps {
            self.run(&["key", action.media_key()])?;
        }
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn run(&self, args: &[&str]) -> Result<(), ServiceError> {
        let output = std::process::Command::new("xdotool")
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ServiceError::Unavailable("input simulation requires xdotool".into())
                } else {
                    ServiceError::Backend(e.to_string())
                }
            })?;

        if !output.status.success() {
            return Err(ServiceError::Backend(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn run(&self, _args: &[&str]) -> Result<(), ServiceError> {
        Err(ServiceError::Unsupported(
            "input simulation is only wired up on Linux",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mapping() {
        assert_eq!(MouseButton::Left.x11_button(), "1");
        assert_eq!(MouseButton::Middle.x11_button(), "2");
        assert_eq!(MouseButton::Right.x11_button(), "3");
    }

    #[test]
    fn test_button_parses_lowercase() {
        let button: MouseButton = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(button, MouseButton::Right);
        assert!(serde_json::from_str::<MouseButton>("\"fourth\"").is_err());
    }

    #[test]
    fn test_keysym_mapping() {
        assert_eq!(keysym("enter"), "Return");
        assert_eq!(keysym("pageup"), "Page_Up");
        // Unknown names pass through unchanged
        assert_eq!(keysym("a"), "a");
        assert_eq!(keysym("F5"), "F5");
    }

    #[test]
    fn test_volume_keys() {
        assert_eq!(VolumeAction::Up.media_key(), "XF86AudioRaiseVolume");
        assert_eq!(VolumeAction::Mute.media_key(), "XF86AudioMute");
    }
}
