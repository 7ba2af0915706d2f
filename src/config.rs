//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::DISCOVERY_PORT;

/// Environment variable holding the shared-secret API token
pub const API_TOKEN_ENV: &str = "PC_REMOTE_API_TOKEN";

/// Fallback token used when the environment variable is unset.
/// Insecure; deployments must override it.
pub const DEFAULT_API_TOKEN: &str = "change-me";

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Shared-secret bearer token required on all authenticated endpoints
    pub api_token: String,

    /// UDP port for LAN discovery probes
    pub discovery_port: u16,

    /// Directory recording files are written to
    pub recordings_dir: PathBuf,

    /// Interval between session sweep passes
    pub session_sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".parse().unwrap(),
            api_token: std::env::var(API_TOKEN_ENV).unwrap_or_else(|_| DEFAULT_API_TOKEN.into()),
            discovery_port: DISCOVERY_PORT,
            recordings_dir: PathBuf::from("recordings"),
            session_sweep_interval: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Create a config from the environment with default settings
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Set the HTTP bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the API token explicitly
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    /// Set the discovery port
    pub fn discovery_port(mut self, port: u16) -> Self {
        self.discovery_port = port;
        self
    }

    /// Set the recordings directory
    pub fn recordings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recordings_dir = dir.into();
        self
    }

    /// Set the session sweep interval
    pub fn session_sweep_interval(mut self, interval: Duration) -> Self {
        self.session_sweep_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.discovery_port, DISCOVERY_PORT);
        assert_eq!(config.session_sweep_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:9001".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .token("s3cret")
            .discovery_port(10000)
            .recordings_dir("/tmp/rec")
            .session_sweep_interval(Duration::from_secs(5));

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.api_token, "s3cret");
        assert_eq!(config.discovery_port, 10000);
        assert_eq!(config.recordings_dir, PathBuf::from("/tmp/rec"));
        assert_eq!(config.session_sweep_interval, Duration::from_secs(5));
    }
}
