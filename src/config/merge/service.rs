//! MergeService: orchestrates sources and deserializes to RosterConfig.

use crate::config::sources::{environment, global_file};
use crate::config::RosterConfig;
use config::{Config, ConfigError, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: serde defaults (lowest) -> config file -> environment (highest).
    ///
    /// An explicit file must exist; the global file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<RosterConfig, ConfigError> {
        let builder = Config::builder();
        let builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => global_file::add_to_builder(builder)?,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
