//! Core types and naming conventions shared across the content store.

/// NodeId: URL path of a document without its suffix, always with a leading slash.
/// The home document maps to [`ROOT_ID`].
pub type NodeId = String;

/// Id of the navigation tree root (the home document).
pub const ROOT_ID: &str = "/";

/// Suffix that marks a file as an indexable document.
pub const DOCUMENT_SUFFIX: &str = ".html";

pub const HOME_DOCUMENT: &str = "home.html";
pub const INDEX_DOCUMENT: &str = "index.html";
pub const TEMPLATE_DOCUMENT: &str = "template.html";
pub const HEADER_DOCUMENT: &str = "header.html";
pub const FOOTER_DOCUMENT: &str = "footer.html";

/// Compute the index id for a URL path, with or without leading slash and suffix.
///
/// `"subdir/child.html"`, `"/subdir/child.html"` and `"/subdir/child"` all map to
/// `"/subdir/child"`; `"home.html"` maps to `"/"`.
pub fn id_for_path(url_path: &str) -> NodeId {
    let trimmed = url_path.trim_start_matches('/');
    let stem = trimmed.strip_suffix(DOCUMENT_SUFFIX).unwrap_or(trimmed);
    let stem = stem.trim_end_matches('/');
    if stem.is_empty() || stem == home_stem() {
        return ROOT_ID.to_string();
    }
    format!("/{}", stem)
}

/// Parent id: the id with its last segment removed; top-level ids have the root as parent.
pub fn parent_id(id: &str) -> Option<NodeId> {
    if id == ROOT_ID {
        return None;
    }
    match id.rfind('/') {
        Some(0) | None => Some(ROOT_ID.to_string()),
        Some(pos) => Some(id[..pos].to_string()),
    }
}

/// Last path segment of an id (the directory or document base name).
pub fn id_name(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Root-relative href of the document behind an id, e.g. `subdir/child.html`.
pub fn href_for_id(id: &str) -> String {
    if id == ROOT_ID {
        return HOME_DOCUMENT.to_string();
    }
    format!("{}{}", id.trim_start_matches('/'), DOCUMENT_SUFFIX)
}

pub(crate) fn home_stem() -> &'static str {
    HOME_DOCUMENT.trim_end_matches(DOCUMENT_SUFFIX)
}
