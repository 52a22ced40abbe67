//! Merge policy: built-in defaults that every source is layered on top of.

pub mod service;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Builder pre-populated with scalar defaults; list defaults come from serde.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("root", ".")?
        .set_default("assets_dir", "assets")?
        .set_default("index_title", "Index")
}
