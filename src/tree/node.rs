//! Navigation node types

use crate::types::NodeId;
use serde::Serialize;

/// Link to a document as shown in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub title: String,
}

/// Header of a group node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Header {
    /// The group's own document exists
    Page(Link),
    /// Bare directory: its name plus a link that would create the document
    Placeholder { name: String, href: String },
}

impl Header {
    pub fn href(&self) -> &str {
        match self {
            Header::Page(link) => &link.href,
            Header::Placeholder { href, .. } => href,
        }
    }

    /// Visible label: the document title or the directory name.
    pub fn label(&self) -> &str {
        match self {
            Header::Page(link) => &link.title,
            Header::Placeholder { name, .. } => name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Header::Placeholder { .. })
    }
}

/// Navigation node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexNode {
    /// A document without a qualifying same-named directory
    Leaf(Link),
    /// A document with a qualifying directory, or a bare directory
    Group {
        header: Header,
        children: Vec<NodeId>,
    },
}

impl IndexNode {
    pub fn group(header: Header) -> Self {
        IndexNode::Group {
            header,
            children: Vec::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, IndexNode::Group { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            IndexNode::Leaf(_) => &[],
            IndexNode::Group { children, .. } => children,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            IndexNode::Leaf(link) => &link.title,
            IndexNode::Group { header, .. } => header.label(),
        }
    }

    pub fn href(&self) -> &str {
        match self {
            IndexNode::Leaf(link) => &link.href,
            IndexNode::Group { header, .. } => header.href(),
        }
    }
}
