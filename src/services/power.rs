//! Power control service
//!
//! Windows only, matching the upstream behavior; any other platform reports
//! `Unsupported` before attempting a side effect.

use serde::Deserialize;

use super::error::ServiceError;

/// Supported power actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Shutdown,
    Restart,
    Lock,
    Logoff,
    Sleep,
    Hibernate,
}

impl PowerAction {
    /// Machine-readable name echoed back in responses
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Shutdown => "shutdown",
            PowerAction::Restart => "restart",
            PowerAction::Lock => "lock",
            PowerAction::Logoff => "logoff",
            PowerAction::Sleep => "sleep",
            PowerAction::Hibernate => "hibernate",
        }
    }

    #[cfg(windows)]
    fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            PowerAction::Shutdown => ("shutdown", &["/s", "/t", "0"]),
            PowerAction::Restart => ("shutdown", &["/r", "/t", "0"]),
            PowerAction::Lock => ("rundll32.exe", &["user32.dll,LockWorkStation"]),
            PowerAction::Logoff => ("shutdown", &["/l"]),
            PowerAction::Sleep => ("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"]),
            PowerAction::Hibernate => ("shutdown", &["/h"]),
        }
    }
}

/// Execute a power action
#[cfg(windows)]
pub fn run_power_action(action: PowerAction) -> Result<(), ServiceError> {
    let (program, args) = action.command();
    tracing::info!(action = action.as_str(), "Power action");
    std::process::Command::new(program)
        .args(args)
        .spawn()
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(())
}

#[cfg(not(windows))]
pub fn run_power_action(action: PowerAction) -> Result<(), ServiceError> {
    tracing::warn!(action = action.as_str(), "Power action rejected off-Windows");
    Err(ServiceError::Unsupported(
        "Power actions supported on Windows only.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parses_lowercase() {
        let action: PowerAction = serde_json::from_str("\"shutdown\"").unwrap();
        assert_eq!(action, PowerAction::Shutdown);
        assert!(serde_json::from_str::<PowerAction>("\"explode\"").is_err());
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in [
            PowerAction::Shutdown,
            PowerAction::Restart,
            PowerAction::Lock,
            PowerAction::Logoff,
            PowerAction::Sleep,
            PowerAction::Hibernate,
        ] {
            let json = format!("\"{}\"", action.as_str());
            let parsed: PowerAction = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn test_rejected_off_windows() {
        assert!(matches!(
            run_power_action(PowerAction::Lock),
            Err(ServiceError::Unsupported(_))
        ));
    }
}
