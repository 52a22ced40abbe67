use crate::integration::support::{children, titled, Site};
use sitetree::store::markup::LEGACY_META_LINE;
use sitetree::store::{HtmlIndexStore, IndexStore};
use sitetree::tree::IndexNode;
use sitetree::Direction;
use std::fs;

/// Artifact as written by the previous generation of the site tooling: a legacy META
/// line and explicitly closed `meta`, `base` and `link` elements.
const HISTORICAL_ARTIFACT: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <META http-equiv="Content-Type" content="text/html; charset=UTF-8">
        <meta content="text/html; charset=UTF-8" http-equiv="content-type"> </meta>
        <meta content="width=device-width, initial-scale=1" name="viewport"> </meta>
        <base target="_top"> </base>
        <title>Index</title>
        <link href="wysiwiki/wysiwiki.css" rel="stylesheet" type="text/css"> </link>
        <link href="style.css" rel="stylesheet" type="text/css"> </link>
        <script src="wysiwiki/index.js"></script>
    </head>
    <body class="resource index">
        <details open="true">
            <summary id="/">
                <a href="home.html">home</a>
            </summary>
            <details>
                <summary id="/subdir">
                    <a href="subdir.html">subdir</a>
                </summary>
                <details>
                    <summary id="/subdir/subsubdir">
                        subsubdir<a class="new-page" href="subdir/subsubdir.html">+</a>
                    </summary>
                    <div id="/subdir/subsubdir/grandchild">
                        <a href="subdir/subsubdir/grandchild.html">grandchild</a>
                    </div>
                </details>
                <div id="/subdir/child">
                    <a href="subdir/child.html">child</a>
                </div>
            </details>
        </details>
    </body>
</html>
"#;

fn populated() -> Site {
    let site = Site::new();
    site.write_at("about.html", &titled("About & Contact"), 10);
    site.write_at("docs/setup.html", &titled("Setup <quick>"), 20);
    site.write_at("docs/usage.html", &titled("Usage \"guide\""), 30);
    site.write_at("blog.html", &titled("Blog"), 40);
    site.write_at("blog/2024/first.html", &titled("First post"), 50);
    site
}

#[test]
fn reopen_reproduces_tree() {
    let site = populated();
    let first = site.open().snapshot();
    let artifact = site.artifact();

    let second = site.open().snapshot();
    assert_eq!(second, first);
    assert_eq!(site.artifact(), artifact);

    let loaded = HtmlIndexStore::new(site.root().join("index.html"), "Index", "assets")
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(loaded, first);
}

#[test]
fn rebuild_orders_siblings_by_modification_time() {
    let site = Site::new();
    site.write_at("newest.html", &titled("Newest"), 300);
    site.write_at("oldest.html", &titled("Oldest"), 100);
    site.write_at("middle/page.html", &titled("Page"), 200);
    let store = site.open();
    assert_eq!(children(&store, "/"), vec!["/oldest", "/middle", "/newest"]);

    assert!(store.move_node("/newest", Direction::Up));
    assert_eq!(store.rebuild().unwrap(), 5);
    assert_eq!(children(&store, "/"), vec!["/oldest", "/middle", "/newest"]);
}

#[test]
fn legacy_meta_line_is_tolerated() {
    let site = populated();
    let expected = site.open().snapshot();

    let patched = site
        .artifact()
        .replacen("<head>\n", &format!("<head>\n{}\n", LEGACY_META_LINE), 1);
    fs::write(site.root().join("index.html"), &patched).unwrap();

    assert_eq!(site.open().snapshot(), expected);
    // loading alone does not rewrite the artifact
    assert_eq!(site.artifact(), patched);
}

#[test]
fn historical_artifact_is_loaded_in_place() {
    let site = Site::new();
    site.write_at("subdir.html", &titled("subdir"), 10);
    site.write_at("subdir/child.html", &titled("child"), 20);
    site.write_at("subdir/subsubdir/grandchild.html", &titled("grandchild"), 30);
    fs::write(site.root().join("index.html"), HISTORICAL_ARTIFACT).unwrap();

    let store = site.open();
    // a rebuild would put the older child first and rewrite the file
    assert_eq!(site.artifact(), HISTORICAL_ARTIFACT);
    assert_eq!(
        children(&store, "/subdir"),
        vec!["/subdir/subsubdir", "/subdir/child"]
    );
    let tree = store.snapshot();
    assert_eq!(tree.root().label(), "home");
    assert!(matches!(
        tree.get("/subdir/subsubdir"),
        Some(IndexNode::Group { header, .. }) if header.is_placeholder()
    ));

    store.create("/subdir/later.html", titled("Later").as_bytes()).unwrap();
    assert_eq!(
        children(&store, "/subdir"),
        vec!["/subdir/subsubdir", "/subdir/child", "/subdir/later"]
    );
    assert!(site.artifact().starts_with("<!DOCTYPE html>"));
    assert!(!site.artifact().contains("</meta>"));
}

#[test]
fn malformed_artifact_triggers_rebuild() {
    let site = populated();
    let expected = site.open().snapshot();

    for garbage in [
        "",
        "not html at all",
        "<html><body><details open=\"true\"><summary id=\"/\"></summary>",
        "<html><body><details open=\"true\"><summary id=\"/\"><a href=\"home.html\">Home</a></summary><p>x</p></details></body></html>",
    ] {
        fs::write(site.root().join("index.html"), garbage).unwrap();
        let store = site.open();
        assert_eq!(store.snapshot(), expected, "rebuild after {garbage:?}");
        assert!(site.artifact().starts_with("<!DOCTYPE html>"));
    }
}

#[test]
fn hand_edited_duplicate_ids_trigger_rebuild() {
    let site = populated();
    let expected = site.open().snapshot();
    let artifact = site.artifact().replace(r#"<div id="/about">"#, r#"<div id="/blog">"#);
    fs::write(site.root().join("index.html"), artifact).unwrap();
    assert_eq!(site.open().snapshot(), expected);
}

#[test]
fn out_of_band_edits_are_picked_up_by_resync() {
    let site = populated();
    let store = site.open();

    site.write_at("docs.html", &titled("Documentation"), 60);
    assert!(store.resync("/docs.html").unwrap());
    assert!(matches!(
        store.snapshot().get("/docs"),
        Some(IndexNode::Group { header, .. }) if header.label() == "Documentation"
    ));
    assert!(!store.resync("/docs.html").unwrap());

    fs::remove_file(site.root().join("blog/2024/first.html")).unwrap();
    assert!(store.resync("blog/2024/first.html").unwrap());
    let tree = store.snapshot();
    assert!(!tree.contains("/blog/2024"));
    assert!(matches!(tree.get("/blog"), Some(IndexNode::Leaf(_))));
    assert!(store.check().unwrap().is_clean());
}

#[test]
fn entities_survive_round_trip() {
    let site = populated();
    let store = site.open();
    let tree = store.snapshot();
    assert_eq!(tree.get("/about").map(IndexNode::label), Some("About & Contact"));
    assert_eq!(tree.get("/docs/setup").map(IndexNode::label), Some("Setup <quick>"));
    assert!(site.artifact_contains(r#"<a href="about.html">About &amp; Contact</a>"#));
    assert_eq!(site.open().snapshot(), tree);
}
