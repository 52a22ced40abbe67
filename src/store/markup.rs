//! Index artifact markup
//!
//! The artifact is an HTML page whose body is a single `<details open="true">` tree:
//! groups are `<details>` with a `<summary id>` header, leaves are `<div id>` wrapping
//! one link. Rendering is deterministic (four spaces per nesting level) so that an
//! unchanged tree always produces byte-identical output.
//!
//! Loading uses a small tag tokenizer rather than a full HTML parser: the artifact is
//! machine-written, and anything that does not match the shape above is reported as
//! malformed so the caller can rebuild from the filesystem.

use crate::error::StoreError;
use crate::tree::{Header, IndexNode, IndexTree, Link};
use crate::types::{parent_id, ROOT_ID};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

const INDENT: &str = "    ";

/// Line emitted by an older writer that does not close; dropped before parsing.
pub const LEGACY_META_LINE: &str =
    r#"<META http-equiv="Content-Type" content="text/html; charset=UTF-8">"#;

/// CSS class of the create-affordance link in a placeholder header.
pub const NEW_PAGE_CLASS: &str = "new-page";

const VOID_ELEMENTS: &[&str] = &["meta", "link", "base", "br", "hr", "img", "input"];

/// Render the complete artifact.
pub fn render(tree: &IndexTree, index_title: &str, assets_dir: &str) -> String {
    let mut out = String::with_capacity(256 + tree.len() * 96);
    let assets = escape(assets_dir.trim_matches('/'));
    out.push_str("<!DOCTYPE html>\n<html>\n");
    push_line(&mut out, 1, "<head>");
    push_line(&mut out, 2, r#"<meta http-equiv="content-type" content="text/html; charset=UTF-8">"#);
    push_line(&mut out, 2, r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    push_line(&mut out, 2, r#"<base target="_top">"#);
    push_line(&mut out, 2, &format!("<title>{}</title>", escape(index_title)));
    push_line(
        &mut out,
        2,
        &format!(r#"<link rel="stylesheet" href="{}/site.css" type="text/css">"#, assets),
    );
    push_line(&mut out, 2, r#"<link rel="stylesheet" href="style.css" type="text/css">"#);
    push_line(&mut out, 2, &format!(r#"<script src="{}/index.js"></script>"#, assets));
    push_line(&mut out, 1, "</head>");
    push_line(&mut out, 1, r#"<body class="resource index">"#);
    render_node(&mut out, tree, ROOT_ID, 2);
    push_line(&mut out, 1, "</body>");
    out.push_str("</html>\n");
    out
}

fn render_node(out: &mut String, tree: &IndexTree, id: &str, depth: usize) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match node {
        IndexNode::Leaf(link) => {
            push_line(out, depth, &format!(r#"<div id="{}">"#, escape(id)));
            push_line(out, depth + 1, &render_link(link));
            push_line(out, depth, "</div>");
        }
        IndexNode::Group { header, children } => {
            if id == ROOT_ID {
                push_line(out, depth, r#"<details open="true">"#);
            } else {
                push_line(out, depth, "<details>");
            }
            push_line(out, depth + 1, &format!(r#"<summary id="{}">"#, escape(id)));
            let line = match header {
                Header::Page(link) => render_link(link),
                Header::Placeholder { name, href } => format!(
                    r#"{}<a class="{}" href="{}">+</a>"#,
                    escape(name),
                    NEW_PAGE_CLASS,
                    escape(href)
                ),
            };
            push_line(out, depth + 2, &line);
            push_line(out, depth + 1, "</summary>");
            for child in children {
                render_node(out, tree, child, depth + 1);
            }
            push_line(out, depth, "</details>");
        }
    }
}

fn render_link(link: &Link) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape(&link.href), escape(&link.title))
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

/// Escape text and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"))
}

/// Decode named and numeric character references. Unknown references are kept as-is.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    entity_re()
        .replace_all(raw, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => body
                    .strip_prefix("#x")
                    .or_else(|| body.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| body.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Content>,
}

#[derive(Debug)]
enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Own text, excluding descendants.
    fn own_text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            if let Content::Text(t) = child {
                text.push_str(t);
            }
        }
        text.trim().to_string()
    }

    /// All descendant text.
    fn text(&self) -> String {
        fn collect(el: &Element, out: &mut String) {
            for child in &el.children {
                match child {
                    Content::Text(t) => out.push_str(t),
                    Content::Element(e) => collect(e, out),
                }
            }
        }
        let mut text = String::new();
        collect(self, &mut text);
        text.trim().to_string()
    }

    fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.elements().find_map(|e| e.find(name))
    }
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)<!--.*?-->|<![^>]*>|<(/)?([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s=/>]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*(/)?>"#,
        )
        .expect("valid regex")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s=/>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).expect("valid regex")
    })
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    attr_re()
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| unescape(m.as_str()))
                .unwrap_or_default();
            (caps[1].to_ascii_lowercase(), value)
        })
        .collect()
}

/// Tokenize into an element tree, requiring balanced tags.
fn parse_document(text: &str, path: &Path) -> Result<Element, StoreError> {
    let mut stack: Vec<Element> = vec![Element::default()];
    let mut last = 0;

    let push_text = |stack: &mut Vec<Element>, raw: &str| {
        if raw.trim().is_empty() {
            return;
        }
        if let Some(top) = stack.last_mut() {
            top.children.push(Content::Text(unescape(raw)));
        }
    };

    for caps in tag_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut stack, &text[last..whole.start()]);
        last = whole.end();

        let Some(name) = caps.get(2) else {
            // comment or doctype
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();

        if caps.get(1).is_some() {
            // older writers closed void elements explicitly (`<meta ...> </meta>`)
            if VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }
            if stack.len() < 2 {
                return Err(StoreError::malformed(path, format!("unexpected </{}>", name)));
            }
            let Some(closed) = stack.pop() else {
                continue;
            };
            if closed.name != name {
                return Err(StoreError::malformed(
                    path,
                    format!("unbalanced tags: <{}> closed by </{}>", closed.name, name),
                ));
            }
            if let Some(parent) = stack.last_mut() {
                parent.children.push(Content::Element(closed));
            }
            continue;
        }

        let element = Element {
            attrs: parse_attrs(caps.get(3).map(|m| m.as_str()).unwrap_or_default()),
            children: Vec::new(),
            name,
        };
        if caps.get(4).is_some() || VOID_ELEMENTS.contains(&element.name.as_str()) {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(Content::Element(element));
            }
        } else {
            stack.push(element);
        }
    }
    push_text(&mut stack, &text[last..]);

    if stack.len() > 1 {
        let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(StoreError::malformed(path, format!("unclosed <{}>", open)));
    }
    stack
        .pop()
        .ok_or_else(|| StoreError::malformed(path, "empty document"))
}

/// Parse artifact text into a navigation tree. `path` is only used for error reports.
pub fn parse(text: &str, path: &Path) -> Result<IndexTree, StoreError> {
    let cleaned: String = text
        .lines()
        .filter(|line| line.trim() != LEGACY_META_LINE)
        .collect::<Vec<_>>()
        .join("\n");
    let document = parse_document(&cleaned, path)?;

    let root = document
        .find("body")
        .and_then(|body| body.elements().find(|e| e.name == "details"))
        .ok_or_else(|| StoreError::malformed(path, "missing root <details>"))?;

    let mut entries = root.elements();
    let summary = entries
        .next()
        .filter(|e| e.name == "summary")
        .ok_or_else(|| StoreError::malformed(path, "root <details> has no <summary>"))?;
    if summary.attr("id") != Some(ROOT_ID) {
        return Err(StoreError::malformed(path, "root <summary> must have id=\"/\""));
    }
    let home = match parse_header(summary, path)? {
        Header::Page(link) => link,
        Header::Placeholder { .. } => {
            return Err(StoreError::malformed(path, "root header must link the home document"))
        }
    };

    let mut tree = IndexTree::new(home);
    let mut pending: Vec<(String, &Element)> = entries.map(|e| (ROOT_ID.to_string(), e)).collect();
    pending.reverse();
    while let Some((parent, element)) = pending.pop() {
        let children = parse_entry(&mut tree, &parent, element, path)?;
        pending.extend(children.into_iter().rev());
    }
    Ok(tree)
}

/// Insert one entry element; returns its own entries (for groups) to be processed next.
fn parse_entry<'e>(
    tree: &mut IndexTree,
    parent: &str,
    element: &'e Element,
    path: &Path,
) -> Result<Vec<(String, &'e Element)>, StoreError> {
    match element.name.as_str() {
        "div" => {
            let id = required_id(element, parent, path)?;
            let a = element
                .elements()
                .find(|e| e.name == "a")
                .ok_or_else(|| StoreError::malformed(path, format!("entry {} has no link", id)))?;
            let link = Link {
                href: required_href(a, path)?,
                title: a.text(),
            };
            insert(tree, parent, &id, IndexNode::Leaf(link), path)?;
            Ok(Vec::new())
        }
        "details" => {
            let mut entries = element.elements();
            let summary = entries
                .next()
                .filter(|e| e.name == "summary")
                .ok_or_else(|| StoreError::malformed(path, "<details> has no <summary>"))?;
            let id = required_id(summary, parent, path)?;
            let header = parse_header(summary, path)?;
            insert(tree, parent, &id, IndexNode::group(header), path)?;
            Ok(entries.map(|e| (id.clone(), e)).collect())
        }
        other => Err(StoreError::malformed(
            path,
            format!("unknown entry element <{}>", other),
        )),
    }
}

fn parse_header(summary: &Element, path: &Path) -> Result<Header, StoreError> {
    let mut links = summary.elements().filter(|e| e.name == "a");
    let a = links
        .next()
        .ok_or_else(|| StoreError::malformed(path, "<summary> has no link"))?;
    let href = required_href(a, path)?;
    let placeholder = a
        .attr("class")
        .map(|class| class.split_whitespace().any(|c| c == NEW_PAGE_CLASS))
        .unwrap_or(false);
    if placeholder {
        Ok(Header::Placeholder {
            name: summary.own_text(),
            href,
        })
    } else {
        Ok(Header::Page(Link { href, title: a.text() }))
    }
}

fn required_id(element: &Element, parent: &str, path: &Path) -> Result<String, StoreError> {
    let id = element
        .attr("id")
        .ok_or_else(|| StoreError::malformed(path, format!("<{}> without id", element.name)))?;
    // an entry must sit under the group its id names
    if parent_id(id).as_deref() != Some(parent) {
        return Err(StoreError::malformed(
            path,
            format!("entry {} is misplaced under {}", id, parent),
        ));
    }
    Ok(id.to_string())
}

fn required_href(a: &Element, path: &Path) -> Result<String, StoreError> {
    a.attr("href")
        .map(str::to_string)
        .ok_or_else(|| StoreError::malformed(path, "<a> without href"))
}

fn insert(tree: &mut IndexTree, parent: &str, id: &str, node: IndexNode, path: &Path) -> Result<(), StoreError> {
    tree.insert(parent, id, node)
        .map_err(|e| StoreError::malformed(path, e.to_string()))
}
