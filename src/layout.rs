//! Site layout: how index ids map onto files and directories under the content root.

use crate::config::SiteConfig;
use crate::title;
use crate::tree::{Header, Link};
use crate::types::{
    href_for_id, id_name, DOCUMENT_SUFFIX, FOOTER_DOCUMENT, HEADER_DOCUMENT, HOME_DOCUMENT,
    INDEX_DOCUMENT, ROOT_ID, TEMPLATE_DOCUMENT,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem view of a content root used by the tree builder and the synchronizer.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    root: PathBuf,
    assets_dir: String,
    reserved: HashSet<String>,
}

impl SiteLayout {
    pub fn new(root: &Path, config: &SiteConfig) -> Self {
        let mut reserved: HashSet<String> = [
            HOME_DOCUMENT,
            INDEX_DOCUMENT,
            TEMPLATE_DOCUMENT,
            HEADER_DOCUMENT,
            FOOTER_DOCUMENT,
        ]
        .iter()
        .map(|name| name.to_string())
        .collect();
        reserved.insert(config.assets_dir.clone());
        // single-segment forbidden prefixes name top-level entries
        for prefix in config.read_forbidden.iter().chain(config.write_forbidden.iter()) {
            let trimmed = prefix.trim_matches('/');
            if !trimmed.is_empty() && !trimmed.contains('/') {
                reserved.insert(trimmed.to_string());
            }
        }
        Self {
            root: root.to_path_buf(),
            assets_dir: config.assets_dir.clone(),
            reserved,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets_dir(&self) -> &str {
        &self.assets_dir
    }

    /// Location of the index artifact.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_DOCUMENT)
    }

    /// The document file behind an id (`/` is the home document).
    pub fn document_path(&self, id: &str) -> PathBuf {
        if id == ROOT_ID {
            return self.root.join(HOME_DOCUMENT);
        }
        self.root.join(href_for_id(id))
    }

    /// The same-named directory of an id (`/` is the root itself).
    pub fn directory_path(&self, id: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in id.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Whether a top-level directory entry name is excluded from the index.
    pub fn is_reserved_entry(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Whether an id is kept out of the index. The root is not reserved. A top-level
    /// id named after a reserved document is only reserved while its directory does
    /// not qualify as a group.
    pub fn is_reserved_id(&self, id: &str) -> bool {
        if id == ROOT_ID {
            return false;
        }
        let mut segments = id.trim_start_matches('/').split('/');
        let first = segments.next().unwrap_or_default();
        let single = segments.next().is_none();
        if self.reserved.contains(first) {
            return true;
        }
        single
            && self.reserved.contains(&format!("{}{}", first, DOCUMENT_SUFFIX))
            && !self.has_group_directory(id)
    }

    pub fn has_document(&self, id: &str) -> bool {
        self.document_path(id).is_file()
    }

    /// Whether the same-named directory of `id` holds at least one document (at any
    /// depth), which makes the node a group. The root is always a group.
    pub fn has_group_directory(&self, id: &str) -> bool {
        id == ROOT_ID || directory_qualifies(&self.directory_path(id))
    }

    /// Link to the document behind `id`, titled from its content.
    pub fn link_for(&self, id: &str) -> Link {
        Link {
            href: href_for_id(id),
            title: title::title(&self.document_path(id)),
        }
    }

    /// Placeholder header for a directory whose document does not exist yet.
    pub fn placeholder_for(&self, id: &str) -> Header {
        Header::Placeholder {
            name: id_name(id).to_string(),
            href: href_for_id(id),
        }
    }

    /// Header for a group node reflecting whether its document exists.
    pub fn header_for(&self, id: &str) -> Header {
        if id == ROOT_ID || self.has_document(id) {
            Header::Page(self.link_for(id))
        } else {
            self.placeholder_for(id)
        }
    }
}

/// A directory qualifies as a group when any document file lives below it.
pub fn directory_qualifies(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && is_document_name(&entry.file_name().to_string_lossy()))
}

pub fn is_document_name(name: &str) -> bool {
    name.len() > DOCUMENT_SUFFIX.len() && name.ends_with(DOCUMENT_SUFFIX)
}
