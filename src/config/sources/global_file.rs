//! Global config file source: $XDG_CONFIG_HOME/roster/config.toml

use crate::config::paths::xdg_root;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use tracing::debug;

/// Add the global config file to builder when it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Ok(path) = xdg_root::global_config_path() else {
        return Ok(builder);
    };
    if !path.is_file() {
        return Ok(builder);
    }

    debug!(path = %path.display(), "Loading global config file");
    Ok(builder.add_source(File::from(path.as_path()).required(false)))
}
