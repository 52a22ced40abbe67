//! Navigation tree arena
//!
//! Nodes live in a map keyed by id; each slot records its parent id and groups keep
//! their ordered child ids. There are no back-pointers to keep in sync beyond the
//! `parent` field, which every mutation below updates together with the parent's
//! child list.

use super::{Direction, Header, IndexNode, Link, TreeError};
use crate::types::{NodeId, ROOT_ID};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    node: IndexNode,
    parent: Option<NodeId>,
}

/// Ordered forest of navigation nodes under the root `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTree {
    slots: HashMap<NodeId, Slot>,
}

impl IndexTree {
    /// Tree holding only the root group, headed by the home document link.
    pub fn new(home: Link) -> Self {
        let mut slots = HashMap::new();
        slots.insert(
            ROOT_ID.to_string(),
            Slot {
                node: IndexNode::group(Header::Page(home)),
                parent: None,
            },
        );
        Self { slots }
    }

    pub fn root(&self) -> &IndexNode {
        &self.slots[ROOT_ID].node
    }

    pub fn get(&self, id: &str) -> Option<&IndexNode> {
        self.slots.get(id).map(|slot| &slot.node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.slots.get(id).and_then(|slot| slot.parent.as_deref())
    }

    pub fn children(&self, id: &str) -> &[NodeId] {
        self.get(id).map(IndexNode::children).unwrap_or(&[])
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append a childless node to the end of a group's children.
    pub fn insert(&mut self, parent: &str, id: &str, node: IndexNode) -> Result<(), TreeError> {
        if self.slots.contains_key(id) {
            return Err(TreeError::DuplicateId(id.to_string()));
        }
        if !node.children().is_empty() {
            return Err(TreeError::ChildrenNotEmpty(id.to_string()));
        }
        match self.slots.get_mut(parent).map(|slot| &mut slot.node) {
            Some(IndexNode::Group { children, .. }) => children.push(id.to_string()),
            Some(IndexNode::Leaf(_)) => return Err(TreeError::NotAGroup(parent.to_string())),
            None => return Err(TreeError::UnknownParent(parent.to_string())),
        }
        self.slots.insert(
            id.to_string(),
            Slot {
                node,
                parent: Some(parent.to_string()),
            },
        );
        Ok(())
    }

    /// Turn a leaf into a group headed by its own link. Returns false if `id` is not a leaf.
    pub fn promote(&mut self, id: &str) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        match &slot.node {
            IndexNode::Leaf(link) => {
                slot.node = IndexNode::group(Header::Page(link.clone()));
                true
            }
            IndexNode::Group { .. } => false,
        }
    }

    /// Turn a group into a leaf with the given link, dropping every descendant.
    /// Returns false for the root, unknown ids and leaves.
    pub fn demote(&mut self, id: &str, link: Link) -> bool {
        if id == ROOT_ID {
            return false;
        }
        let children = match self.slots.get(id).map(|slot| &slot.node) {
            Some(IndexNode::Group { children, .. }) => children.clone(),
            _ => return false,
        };
        for child in children {
            self.drop_subtree(&child);
        }
        if let Some(slot) = self.slots.get_mut(id) {
            slot.node = IndexNode::Leaf(link);
        }
        true
    }

    /// Remove a node and its subtree, detaching it from its parent.
    pub fn remove(&mut self, id: &str) -> Option<IndexNode> {
        if id == ROOT_ID {
            return None;
        }
        let parent = self.slots.get(id)?.parent.clone();
        if let Some(parent) = parent {
            if let Some(IndexNode::Group { children, .. }) =
                self.slots.get_mut(&parent).map(|slot| &mut slot.node)
            {
                children.retain(|child| child != id);
            }
        }
        self.drop_subtree(id)
    }

    fn drop_subtree(&mut self, id: &str) -> Option<IndexNode> {
        let slot = self.slots.remove(id)?;
        for child in slot.node.children() {
            self.drop_subtree(child);
        }
        Some(slot.node)
    }

    /// Replace a leaf's link. Returns true if it differed.
    pub fn set_link(&mut self, id: &str, link: Link) -> bool {
        match self.slots.get_mut(id).map(|slot| &mut slot.node) {
            Some(IndexNode::Leaf(current)) if *current != link => {
                *current = link;
                true
            }
            _ => false,
        }
    }

    /// Replace a group's header. Returns true if it differed.
    pub fn set_header(&mut self, id: &str, header: Header) -> bool {
        match self.slots.get_mut(id).map(|slot| &mut slot.node) {
            Some(IndexNode::Group { header: current, .. }) if *current != header => {
                *current = header;
                true
            }
            _ => false,
        }
    }

    /// Swap a node (with its subtree) with its previous or next sibling.
    ///
    /// Returns false for the root, unknown ids, and when the node already sits at the
    /// corresponding edge of its group.
    pub fn move_node(&mut self, id: &str, direction: Direction) -> bool {
        if id == ROOT_ID {
            return false;
        }
        let Some(parent) = self.parent(id).map(str::to_string) else {
            return false;
        };
        let Some(IndexNode::Group { children, .. }) =
            self.slots.get_mut(&parent).map(|slot| &mut slot.node)
        else {
            return false;
        };
        let Some(pos) = children.iter().position(|child| child == id) else {
            return false;
        };
        match direction {
            // position 0 would put the node above the group's own header
            Direction::Up if pos > 0 => children.swap(pos - 1, pos),
            Direction::Down if pos + 1 < children.len() => children.swap(pos, pos + 1),
            _ => return false,
        }
        true
    }

    /// Depth-first (document order) traversal: `(depth, id, node)` with the root at depth 0.
    pub fn walk(&self) -> Vec<(usize, &str, &IndexNode)> {
        let mut out = Vec::with_capacity(self.slots.len());
        let mut stack: Vec<(usize, &str)> = vec![(0, ROOT_ID)];
        while let Some((depth, id)) = stack.pop() {
            let Some(slot) = self.slots.get(id) else {
                continue;
            };
            out.push((depth, id, &slot.node));
            for child in slot.node.children().iter().rev() {
                stack.push((depth + 1, child.as_str()));
            }
        }
        out
    }

    /// Structural consistency problems; empty when the arena is sound.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for (_, id, node) in self.walk() {
            if !seen.insert(id) {
                problems.push(format!("{} is listed more than once", id));
            }
            for child in node.children() {
                match self.slots.get(child) {
                    None => problems.push(format!("{} lists unknown child {}", id, child)),
                    Some(slot) if slot.parent.as_deref() != Some(id) => problems.push(format!(
                        "{} lists {} whose parent is {:?}",
                        id, child, slot.parent
                    )),
                    Some(_) => {}
                }
            }
        }
        for id in self.slots.keys() {
            if !seen.contains(id.as_str()) {
                problems.push(format!("{} is not reachable from the root", id));
            }
        }
        if !self.root().is_group() {
            problems.push("root is not a group".to_string());
        }
        problems
    }
}
