//! Configuration
//!
//! Layered: built-in defaults, then one TOML file, then `ROSTER__*`
//! environment variables. See [`ConfigLoader`].

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::session::{
    SessionSettings, DEFAULT_HEARTBEAT_TIMEOUT, DEFAULT_MAX_FRAME_LEN, DEFAULT_READ_CHUNK_SIZE,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whole-process configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener and per-session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address the agent listener binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Seconds a registered agent may stay silent
    #[serde(default = "default_heartbeat_timeout_secs")]
    pub heartbeat_timeout_secs: u64,

    /// Bytes requested from the socket per read
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,

    /// Longest frame accepted before the session is dropped
    #[serde(default = "default_max_frame_len")]
    pub max_frame_len: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1:10001".to_string()
}

fn default_heartbeat_timeout_secs() -> u64 {
    DEFAULT_HEARTBEAT_TIMEOUT.as_secs()
}

fn default_read_chunk_size() -> usize {
    DEFAULT_READ_CHUNK_SIZE
}

fn default_max_frame_len() -> usize {
    DEFAULT_MAX_FRAME_LEN
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            heartbeat_timeout_secs: default_heartbeat_timeout_secs(),
            read_chunk_size: default_read_chunk_size(),
            max_frame_len: default_max_frame_len(),
        }
    }
}

impl ServerSettings {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.listen_addr.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "server.listen_addr must not be empty".to_string(),
            ));
        }
        if self.heartbeat_timeout_secs == 0 {
            return Err(ApiError::ConfigError(
                "server.heartbeat_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.read_chunk_size == 0 {
            return Err(ApiError::ConfigError(
                "server.read_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.max_frame_len < self.read_chunk_size {
            return Err(ApiError::ConfigError(format!(
                "server.max_frame_len ({}) must be at least server.read_chunk_size ({})",
                self.max_frame_len, self.read_chunk_size
            )));
        }
        Ok(())
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            heartbeat_timeout: self.heartbeat_timeout(),
            read_chunk_size: self.read_chunk_size,
            max_frame_len: self.max_frame_len,
        }
    }
}
