//! Path sandbox
//!
//! Maps slash-delimited URL paths onto the content root and enforces the read and
//! write forbidden-prefix lists. Normalization is lexical so that paths of documents
//! that do not exist yet can be checked before anything touches the disk.

use crate::error::StoreError;
use std::path::{Path, PathBuf};

/// A URL path resolved against the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute filesystem location, always inside the root
    pub absolute: PathBuf,
    /// Normalized root-relative URL path without leading slash (`""` for the root)
    pub relative: String,
}

impl ResolvedPath {
    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }
}

/// Resolves URL paths against a content root and guards forbidden prefixes.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    read_forbidden: Vec<PathBuf>,
    write_forbidden: Vec<PathBuf>,
}

impl PathResolver {
    /// Create a resolver. `write_forbidden` is extended with `read_forbidden`, so the
    /// write list is always a superset of the read list.
    pub fn new<S: AsRef<str>>(root: &Path, read_forbidden: &[S], write_forbidden: &[S]) -> Self {
        let read_forbidden: Vec<PathBuf> = read_forbidden
            .iter()
            .map(|prefix| join_relative(root, prefix.as_ref()))
            .collect();
        let mut write = read_forbidden.clone();
        for prefix in write_forbidden {
            let path = join_relative(root, prefix.as_ref());
            if !write.contains(&path) {
                write.push(path);
            }
        }
        Self {
            root: root.to_path_buf(),
            read_forbidden,
            write_forbidden: write,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `url_path` (with or without leading slash) onto the root and normalize
    /// `.` and `..` segments.
    pub fn resolve(&self, url_path: &str) -> Result<ResolvedPath, StoreError> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in url_path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(StoreError::PathEscapesRoot(url_path.to_string()));
                    }
                }
                s if s.contains('\\') || s.contains('\0') => {
                    return Err(StoreError::PathEscapesRoot(url_path.to_string()));
                }
                s => segments.push(s),
            }
        }

        let mut absolute = self.root.clone();
        for segment in &segments {
            absolute.push(segment);
        }
        if !absolute.starts_with(&self.root) {
            return Err(StoreError::PathEscapesRoot(url_path.to_string()));
        }

        Ok(ResolvedPath {
            absolute,
            relative: segments.join("/"),
        })
    }

    pub fn check_readable(&self, path: &ResolvedPath) -> Result<(), StoreError> {
        check_prefixes(&self.read_forbidden, path)
    }

    pub fn check_writable(&self, path: &ResolvedPath) -> Result<(), StoreError> {
        check_prefixes(&self.write_forbidden, path)
    }

    /// Resolve and require readability in one step.
    pub fn resolve_readable(&self, url_path: &str) -> Result<ResolvedPath, StoreError> {
        let resolved = self.resolve(url_path)?;
        self.check_readable(&resolved)?;
        Ok(resolved)
    }

    /// Resolve and require writability in one step.
    pub fn resolve_writable(&self, url_path: &str) -> Result<ResolvedPath, StoreError> {
        let resolved = self.resolve(url_path)?;
        self.check_writable(&resolved)?;
        Ok(resolved)
    }
}

fn check_prefixes(forbidden: &[PathBuf], path: &ResolvedPath) -> Result<(), StoreError> {
    // Path::starts_with compares whole components: "WEB-INFO" is not under "WEB-INF"
    if forbidden.iter().any(|prefix| path.absolute.starts_with(prefix)) {
        return Err(StoreError::ForbiddenPath(format!("/{}", path.relative)));
    }
    Ok(())
}

fn join_relative(root: &Path, prefix: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in prefix.split('/').filter(|s| !s.is_empty() && *s != ".") {
        path.push(segment);
    }
    path
}
