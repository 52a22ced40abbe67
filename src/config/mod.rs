//! Configuration for a content root.
//!
//! Sources are merged by [`merge::service::MergeService`]; callers normally go through
//! the [`ConfigLoader`] facade.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_index_title() -> String {
    "Index".to_string()
}

fn default_read_forbidden() -> Vec<String> {
    vec!["WEB-INF".to_string(), "META-INF".to_string()]
}

fn default_write_forbidden() -> Vec<String> {
    vec!["rss.xml".to_string()]
}

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Content root directory holding the documents and the index artifact
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Generated-assets subdirectory (readable, never writable, never indexed)
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Page title written into the index artifact
    #[serde(default = "default_index_title")]
    pub index_title: String,

    /// Root-relative prefixes that can be neither read nor written
    #[serde(default = "default_read_forbidden")]
    pub read_forbidden: Vec<String>,

    /// Additional root-relative prefixes that can be read but not written.
    /// The assets directory and the index artifact are always included.
    #[serde(default = "default_write_forbidden")]
    pub write_forbidden: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SiteConfig {
    /// Default configuration rooted at the given directory.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            assets_dir: default_assets_dir(),
            index_title: default_index_title(),
            read_forbidden: default_read_forbidden(),
            write_forbidden: default_write_forbidden(),
            logging: LoggingConfig::default(),
        }
    }
}
