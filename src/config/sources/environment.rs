//! Environment variable source: SITETREE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `SITETREE__ROOT=/srv/wiki`, `SITETREE__LOGGING__LEVEL=debug`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("SITETREE")
            .separator("__")
            .try_parsing(true),
    ))
}
