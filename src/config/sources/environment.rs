//! Environment variable source: ROSTER__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `ROSTER__SERVER__HEARTBEAT_TIMEOUT_SECS=5` sets `server.heartbeat_timeout_secs`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("ROSTER")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
