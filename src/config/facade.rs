//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::RosterConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration and validate the server section.
    ///
    /// `explicit` replaces the global config file; when it is `None` the XDG
    /// file is used if one exists.
    pub fn load(explicit: Option<&Path>) -> Result<RosterConfig, ApiError> {
        let config = MergeService::load(explicit)?;
        config.server.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<RosterConfig, ApiError> {
        Self::load(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(
            r#"
[server]
listen_addr = "0.0.0.0:4000"
heartbeat_timeout_secs = 30

[logging]
level = "debug"
format = "json"
"#,
        );

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:4000");
        assert_eq!(config.server.heartbeat_timeout_secs, 30);
        assert_eq!(config.server.max_frame_len, 4096);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let file = toml_file("[server]\nheartbeat_timeout_secs = 0\n");
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(ConfigLoader::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[server]\nread_chunk_size = 16\n");

        std::env::set_var("ROSTER__SERVER__READ_CHUNK_SIZE", "64");
        let loaded = ConfigLoader::load_from_file(file.path());
        std::env::remove_var("ROSTER__SERVER__READ_CHUNK_SIZE");

        assert_eq!(loaded.unwrap().server.read_chunk_size, 64);
    }

    #[test]
    fn test_default_is_valid() {
        let config = RosterConfig::default();
        assert!(config.server.validate().is_ok());
    }
}
