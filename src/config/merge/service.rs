//! MergeService: orchestrates sources, applies merge policy, deserializes to SiteConfig.

use crate::config::sources::{environment, global_file};
use crate::config::SiteConfig;
use config::{ConfigError, File};
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment
    /// -> root override (highest).
    pub fn load(explicit_file: Option<&Path>, root: Option<&Path>) -> Result<SiteConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;
        let builder = match root {
            Some(root) => builder.set_override("root", root.to_string_lossy().to_string())?,
            None => builder,
        };

        let config = builder.build()?;
        config.try_deserialize()
    }
}
