//! Document titles.

use crate::types::DOCUMENT_SUFFIX;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

/// Number of leading lines searched for a `<title>` tag.
pub const TITLE_SCAN_LINES: usize = 10;

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<title>(.*?)</title>").expect("valid regex"))
}

/// Title of a document: the `<title>` found in its first lines, or the file name
/// without the document suffix.
pub fn title(path: &Path) -> String {
    scan_title(path).unwrap_or_else(|| fallback_title(path))
}

/// Title derived from the file name alone.
pub fn fallback_title(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match name.strip_suffix(DOCUMENT_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

fn scan_title(path: &Path) -> Option<String> {
    let is_document = path
        .file_name()
        .map(|n| n.to_string_lossy().ends_with(DOCUMENT_SUFFIX))
        .unwrap_or(false);
    if !is_document || !path.is_file() {
        return None;
    }

    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    for _ in 0..TITLE_SCAN_LINES {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Failed to read title from {}: {}", path.display(), e);
                return None;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(captures) = title_re().captures(&line) {
            // only the first match counts, even when it is blank
            let title = captures[1].trim();
            return if title.is_empty() {
                None
            } else {
                Some(title.to_string())
            };
        }
    }
    None
}
