//! Content Store
//!
//! Sandboxed document I/O for one content root, keeping the index artifact in step
//! with every document write. The navigation tree sits behind a single mutex that is
//! held for the whole read-modify-persist sequence of a mutation; each mutation works
//! on a copy of the tree that only replaces the current one once it has been written.
//!
//! Document writes are never rolled back: if the index cannot be repaired or
//! persisted afterwards the failure is logged and the previous tree stays current.

use crate::config::SiteConfig;
use crate::error::StoreError;
use crate::layout::{is_document_name, SiteLayout};
use crate::paths::{PathResolver, ResolvedPath};
use crate::store::{HtmlIndexStore, IndexStore};
use crate::sync::Synchronizer;
use crate::title;
use crate::tree::{Direction, Header, IndexNode, IndexTree, TreeBuilder};
use crate::types::{id_for_path, NodeId, INDEX_DOCUMENT, ROOT_ID};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Document store and index maintainer for a content root.
pub struct ContentStore {
    layout: SiteLayout,
    resolver: PathResolver,
    index: Box<dyn IndexStore>,
    tree: Mutex<IndexTree>,
}

/// Summary of the index against the filesystem.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub nodes: usize,
    pub groups: usize,
    pub leaves: usize,
    pub placeholders: usize,
    /// Structural problems in the in-memory tree
    pub problems: Vec<String>,
    /// Indexable on disk but absent from the index
    pub missing: Vec<NodeId>,
    /// Present in the index but no longer backed by the filesystem
    pub stale: Vec<NodeId>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty() && self.missing.is_empty() && self.stale.is_empty()
    }
}

impl ContentStore {
    /// Open the content root named by `config`, loading the index artifact or
    /// rebuilding it when it is absent or unreadable.
    pub fn open(config: &SiteConfig) -> Result<Self, StoreError> {
        let root = canonical_root(&config.root)?;
        let layout = SiteLayout::new(&root, config);
        let index = HtmlIndexStore::new(layout.index_path(), &config.index_title, &config.assets_dir);
        Self::init(config, layout, Box::new(index))
    }

    /// Open with a caller-supplied index store.
    pub fn with_index_store(config: &SiteConfig, index: Box<dyn IndexStore>) -> Result<Self, StoreError> {
        let root = canonical_root(&config.root)?;
        let layout = SiteLayout::new(&root, config);
        Self::init(config, layout, index)
    }

    fn init(config: &SiteConfig, layout: SiteLayout, index: Box<dyn IndexStore>) -> Result<Self, StoreError> {
        let mut write_forbidden = config.write_forbidden.clone();
        write_forbidden.push(config.assets_dir.clone());
        write_forbidden.push(INDEX_DOCUMENT.to_string());
        let resolver = PathResolver::new(layout.root(), &config.read_forbidden, &write_forbidden);

        let tree = match index.load() {
            Ok(Some(tree)) => {
                tracing::info!(root = %layout.root().display(), nodes = tree.len(), "Loaded index");
                tree
            }
            Ok(None) => {
                tracing::info!(root = %layout.root().display(), "No index found, building");
                let tree = TreeBuilder::new(&layout).build()?;
                index.write(&tree)?;
                tree
            }
            Err(e) => {
                tracing::warn!(root = %layout.root().display(), error = %e, "Rebuilding unreadable index");
                let tree = TreeBuilder::new(&layout).build()?;
                index.write(&tree)?;
                tree
            }
        };

        Ok(Self {
            layout,
            resolver,
            index,
            tree: Mutex::new(tree),
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Location of the index artifact.
    pub fn index_path(&self) -> PathBuf {
        self.layout.index_path()
    }

    /// Create a new file. Fails if it already exists.
    pub fn create(&self, url_path: &str, content: &[u8]) -> Result<(), StoreError> {
        let resolved = self.resolver.resolve_writable(url_path)?;
        let mut tree = self.tree.lock();
        if resolved.is_root() || resolved.absolute.exists() {
            return Err(StoreError::AlreadyExists(display_path(&resolved)));
        }
        if let Some(parent) = resolved.absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&resolved.absolute) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(display_path(&resolved)))
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content)?;
        file.sync_all()?;
        tracing::info!(path = %display_path(&resolved), bytes = content.len(), "Created");

        self.sync_after_write(&mut tree, &resolved);
        Ok(())
    }

    /// Open a file for reading.
    pub fn read(&self, url_path: &str) -> Result<File, StoreError> {
        let resolved = self.resolver.resolve_readable(url_path)?;
        if !resolved.absolute.is_file() {
            return Err(StoreError::NotFound(display_path(&resolved)));
        }
        Ok(File::open(&resolved.absolute)?)
    }

    /// Replace the content of an existing file.
    pub fn update(&self, url_path: &str, content: &[u8]) -> Result<(), StoreError> {
        let resolved = self.resolver.resolve_writable(url_path)?;
        let mut tree = self.tree.lock();
        if !resolved.absolute.is_file() {
            return Err(StoreError::NotFound(display_path(&resolved)));
        }
        fs::write(&resolved.absolute, content)?;
        tracing::info!(path = %display_path(&resolved), bytes = content.len(), "Updated");

        self.sync_after_write(&mut tree, &resolved);
        Ok(())
    }

    /// Delete an existing file.
    pub fn delete(&self, url_path: &str) -> Result<(), StoreError> {
        let resolved = self.resolver.resolve_writable(url_path)?;
        let mut tree = self.tree.lock();
        if !resolved.absolute.is_file() {
            return Err(StoreError::NotFound(display_path(&resolved)));
        }
        fs::remove_file(&resolved.absolute)?;
        tracing::info!(path = %display_path(&resolved), "Deleted");

        self.sync_after_write(&mut tree, &resolved);
        Ok(())
    }

    /// Swap a node with its previous or next sibling and persist the new order.
    ///
    /// `target` may be an id or a document path. Returns false when nothing moved,
    /// including when the new order could not be written.
    pub fn move_node(&self, target: &str, direction: Direction) -> bool {
        let id = id_for_path(target);
        if id == ROOT_ID {
            return false;
        }
        let mut tree = self.tree.lock();
        let mut working = tree.clone();
        if !working.move_node(&id, direction) {
            tracing::debug!(id = %id, %direction, "Nothing to move");
            return false;
        }
        match self.index.write(&working) {
            Ok(()) => {
                *tree = working;
                tracing::info!(id = %id, %direction, "Moved");
                true
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Failed to persist moved index");
                false
            }
        }
    }

    /// Title of a readable document.
    pub fn title(&self, url_path: &str) -> Result<String, StoreError> {
        let resolved = self.resolver.resolve_readable(url_path)?;
        Ok(title::title(&resolved.absolute))
    }

    /// Discard the current tree, rescan the whole root and persist the result.
    /// Returns the number of nodes.
    pub fn rebuild(&self) -> Result<usize, StoreError> {
        let mut tree = self.tree.lock();
        let fresh = TreeBuilder::new(&self.layout).build()?;
        self.index.write(&fresh)?;
        let nodes = fresh.len();
        *tree = fresh;
        tracing::info!(root = %self.root().display(), nodes, "Rebuilt index");
        Ok(nodes)
    }

    /// Repair the index for a document changed outside the store.
    /// Returns whether the index was rewritten.
    pub fn resync(&self, url_path: &str) -> Result<bool, StoreError> {
        let resolved = self.resolver.resolve_readable(url_path)?;
        let mut tree = self.tree.lock();
        let mut working = tree.clone();
        let report = Synchronizer::new(&self.layout).synchronize(&mut working, &resolved.relative)?;
        if !report.changed() {
            return Ok(false);
        }
        self.index.write(&working)?;
        *tree = working;
        Ok(true)
    }

    /// Copy of the current navigation tree.
    pub fn snapshot(&self) -> IndexTree {
        self.tree.lock().clone()
    }

    /// Compare the current tree against a fresh scan of the root.
    pub fn check(&self) -> Result<CheckReport, StoreError> {
        let tree = self.snapshot();
        let scanned = TreeBuilder::new(&self.layout).build()?;

        let mut report = CheckReport {
            nodes: tree.len(),
            problems: tree.validate(),
            ..CheckReport::default()
        };
        for (_, _, node) in tree.walk() {
            match node {
                IndexNode::Leaf(_) => report.leaves += 1,
                IndexNode::Group { header, .. } => {
                    report.groups += 1;
                    if let Header::Placeholder { .. } = header {
                        report.placeholders += 1;
                    }
                }
            }
        }

        let indexed: BTreeSet<&str> = tree.walk().into_iter().map(|(_, id, _)| id).collect();
        let on_disk: BTreeSet<&str> = scanned.walk().into_iter().map(|(_, id, _)| id).collect();
        report.missing = on_disk.difference(&indexed).map(|id| id.to_string()).collect();
        report.stale = indexed.difference(&on_disk).map(|id| id.to_string()).collect();
        Ok(report)
    }

    fn sync_after_write(&self, tree: &mut IndexTree, resolved: &ResolvedPath) {
        let name = resolved.relative.rsplit('/').next().unwrap_or_default();
        if !is_document_name(name) {
            return;
        }
        let mut working = tree.clone();
        let result = Synchronizer::new(&self.layout)
            .synchronize(&mut working, &resolved.relative)
            .and_then(|report| {
                if report.changed() {
                    self.index.write(&working)?;
                }
                Ok(report.changed())
            });
        match result {
            Ok(true) => *tree = working,
            Ok(false) => {}
            Err(e) => tracing::error!(
                path = %display_path(resolved),
                error = %e,
                "Failed to update index"
            ),
        }
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, StoreError> {
    dunce::canonicalize(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::NotFound(root.display().to_string()),
        _ => StoreError::Io(e),
    })
}

fn display_path(resolved: &ResolvedPath) -> String {
    format!("/{}", resolved.relative)
}
