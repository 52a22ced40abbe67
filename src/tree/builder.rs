//! Full scan of a content root into a navigation tree

use super::{IndexNode, IndexTree};
use crate::error::StoreError;
use crate::layout::{directory_qualifies, is_document_name, SiteLayout};
use crate::types::{id_for_path, ROOT_ID};
use std::cmp::Ordering;
use std::path::Path;
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Derives navigation nodes from the filesystem.
pub struct TreeBuilder<'a> {
    layout: &'a SiteLayout,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(layout: &'a SiteLayout) -> Self {
        Self { layout }
    }

    /// Scan the whole content root.
    pub fn build(&self) -> Result<IndexTree, StoreError> {
        let mut tree = IndexTree::new(self.layout.link_for(ROOT_ID));
        self.index_directory(&mut tree, ROOT_ID, self.layout.root())?;
        tracing::debug!(nodes = tree.len(), "Scanned content root");
        Ok(tree)
    }

    /// Append the node for `id` under `parent`, scanning its directory when it forms a
    /// group. Returns false when `id` is already present or is neither a document nor a
    /// qualifying directory.
    pub fn attach(&self, tree: &mut IndexTree, parent: &str, id: &str) -> Result<bool, StoreError> {
        if tree.contains(id) || self.layout.is_reserved_id(id) {
            return Ok(false);
        }
        if self.layout.has_group_directory(id) {
            tree.insert(parent, id, IndexNode::group(self.layout.header_for(id)))?;
            self.index_directory(tree, id, &self.layout.directory_path(id))?;
            Ok(true)
        } else if self.layout.has_document(id) {
            tree.insert(parent, id, IndexNode::Leaf(self.layout.link_for(id)))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Attach every entry of `dir` not yet present under the group `parent`, oldest first.
    pub fn index_directory(&self, tree: &mut IndexTree, parent: &str, dir: &Path) -> Result<(), StoreError> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by(by_modification_time);

        for entry in walker {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if parent == ROOT_ID && self.layout.is_reserved_entry(&name) {
                continue;
            }
            let id = child_id(parent, &name);
            if entry.file_type().is_file() {
                // a document with a qualifying directory is emitted at the directory's position
                if !is_document_name(&name) || directory_qualifies(&self.layout.directory_path(&id)) {
                    continue;
                }
            } else if !entry.file_type().is_dir() || !directory_qualifies(entry.path()) {
                continue;
            }
            self.attach(tree, parent, &id)?;
        }
        Ok(())
    }
}

fn child_id(parent: &str, name: &str) -> String {
    if parent == ROOT_ID {
        id_for_path(name)
    } else {
        id_for_path(&format!("{}/{}", parent, name))
    }
}

fn modified(entry: &DirEntry) -> Option<SystemTime> {
    entry.metadata().ok().and_then(|m| m.modified().ok())
}

fn by_modification_time(a: &DirEntry, b: &DirEntry) -> Ordering {
    modified(a)
        .cmp(&modified(b))
        .then_with(|| a.file_name().cmp(b.file_name()))
}
