//! HTML index artifact on disk

use super::{markup, IndexStore};
use crate::error::StoreError;
use crate::tree::IndexTree;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the tree as `index.html` markup, written through a temp file and renamed into place.
#[derive(Debug, Clone)]
pub struct HtmlIndexStore {
    path: PathBuf,
    index_title: String,
    assets_dir: String,
}

impl HtmlIndexStore {
    pub fn new(path: impl Into<PathBuf>, index_title: impl Into<String>, assets_dir: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            index_title: index_title.into(),
            assets_dir: assets_dir.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IndexStore for HtmlIndexStore {
    fn load(&self) -> Result<Option<IndexTree>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| StoreError::malformed(&self.path, format!("not UTF-8: {}", e)))?;
        markup::parse(&text, &self.path).map(Some)
    }

    fn write(&self, tree: &IndexTree) -> Result<(), StoreError> {
        let html = markup::render(tree, &self.index_title, &self.assets_dir);
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // same directory as the target so the rename stays on one filesystem
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(html.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), nodes = tree.len(), "Wrote index");
        Ok(())
    }
}
