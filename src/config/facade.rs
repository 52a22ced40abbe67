//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::SiteConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment, optionally pinning the root.
    pub fn load(root: Option<&Path>) -> Result<SiteConfig, ConfigError> {
        MergeService::load(None, root)
    }

    /// Load configuration from a specific file (layered over the global file).
    pub fn load_from_file(path: &Path, root: Option<&Path>) -> Result<SiteConfig, ConfigError> {
        MergeService::load(Some(path), root)
    }

    /// Create default configuration.
    pub fn default() -> SiteConfig {
        SiteConfig::default()
    }
}
