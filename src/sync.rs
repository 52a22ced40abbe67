//! Index Synchronizer
//!
//! Repairs the navigation tree after a single document changed on disk. Only the node
//! for the changed path and, while repairs keep changing something, its ancestors are
//! visited; the rest of the tree is left untouched. The walk up is a plain loop over
//! parent ids, so its length is bounded by the depth of the path.

use crate::error::StoreError;
use crate::layout::SiteLayout;
use crate::tree::{IndexNode, IndexTree, TreeBuilder};
use crate::types::{id_for_path, parent_id, NodeId, ROOT_ID};
use std::time::Instant;

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Ids that were inserted, reshaped, retitled or removed, deepest first
    pub repaired: Vec<NodeId>,
}

impl SyncReport {
    /// Whether the tree must be persisted.
    pub fn changed(&self) -> bool {
        !self.repaired.is_empty()
    }
}

/// Incremental tree repair against a site layout.
pub struct Synchronizer<'a> {
    layout: &'a SiteLayout,
}

impl<'a> Synchronizer<'a> {
    pub fn new(layout: &'a SiteLayout) -> Self {
        Self { layout }
    }

    /// Bring the tree in line with the filesystem for the document at `url_path`.
    pub fn synchronize(&self, tree: &mut IndexTree, url_path: &str) -> Result<SyncReport, StoreError> {
        let start = Instant::now();
        let mut report = SyncReport::default();
        let mut id = id_for_path(url_path);
        if self.layout.is_reserved_id(&id) {
            tracing::debug!(id = %id, "Reserved path is not indexed");
            return Ok(report);
        }

        loop {
            let Some(repaired) = self.repair(tree, &id)? else {
                break;
            };
            tracing::debug!(id = %repaired, "Repaired index node");
            let next = parent_id(&repaired);
            report.repaired.push(repaired);
            match next {
                Some(parent) => id = parent,
                None => break,
            }
        }

        tracing::debug!(
            path = url_path,
            repaired = report.repaired.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Synchronized index"
        );
        Ok(report)
    }

    /// Repair one level. Returns the id that changed, which is `id` itself unless a
    /// missing ancestor had to be inserted first.
    fn repair(&self, tree: &mut IndexTree, id: &str) -> Result<Option<NodeId>, StoreError> {
        if id == ROOT_ID {
            let changed = tree.set_header(ROOT_ID, self.layout.header_for(ROOT_ID));
            return Ok(changed.then(|| id.to_string()));
        }
        if self.layout.is_reserved_id(id) {
            return Ok(tree.remove(id).map(|_| id.to_string()));
        }
        let has_document = self.layout.has_document(id);
        let qualifies = self.layout.has_group_directory(id);

        let Some(is_group) = tree.get(id).map(IndexNode::is_group) else {
            if !has_document && !qualifies {
                return Ok(None);
            }
            return self.insert_missing(tree, id);
        };

        if !has_document && !qualifies {
            tree.remove(id);
            return Ok(Some(id.to_string()));
        }

        let changed = match (is_group, qualifies) {
            (false, true) => {
                tree.promote(id);
                tree.set_header(id, self.layout.header_for(id));
                TreeBuilder::new(self.layout).index_directory(tree, id, &self.layout.directory_path(id))?;
                true
            }
            // a group without a qualifying directory keeps only its document
            (true, false) => tree.demote(id, self.layout.link_for(id)),
            (false, false) => tree.set_link(id, self.layout.link_for(id)),
            (true, true) => tree.set_header(id, self.layout.header_for(id)),
        };
        Ok(changed.then(|| id.to_string()))
    }

    /// Insert the highest missing ancestor-or-self of `id`, which attaches `id` with it.
    fn insert_missing(&self, tree: &mut IndexTree, id: &str) -> Result<Option<NodeId>, StoreError> {
        let mut missing = id.to_string();
        let parent = loop {
            let Some(parent) = parent_id(&missing) else {
                return Ok(None);
            };
            if tree.contains(&parent) {
                break parent;
            }
            missing = parent;
        };

        let builder = TreeBuilder::new(self.layout);
        if tree.promote(&parent) {
            // the former leaf gathers everything its new directory holds
            tree.set_header(&parent, self.layout.header_for(&parent));
            builder.index_directory(tree, &parent, &self.layout.directory_path(&parent))?;
            return Ok(tree.contains(&missing).then_some(missing));
        }
        if builder.attach(tree, &parent, &missing)? {
            Ok(Some(missing))
        } else {
            Ok(None)
        }
    }
}
