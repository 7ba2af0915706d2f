//! Process launcher service
//!
//! Fire-and-forget spawn of a program on the host. The child is not tracked
//! or reaped; the caller only learns whether the spawn itself succeeded.

use std::process::{Command, Stdio};

use super::error::ServiceError;

/// Spawn `command` with `args`, detached from the server's stdio
pub fn launch(command: &str, args: &[String]) -> Result<(), ServiceError> {
    tracing::info!(command, ?args, "Launching process");

    Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ServiceError::MissingBinary(command.to_string())
            } else {
                ServiceError::Backend(e.to_string())
            }
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let err = launch("definitely-not-a-real-binary-450", &[]).unwrap_err();
        assert!(matches!(err, ServiceError::MissingBinary(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_succeeds() {
        launch("true", &[]).unwrap();
    }
}
