use crate::integration::support::{children, titled, Site};
use sitetree::tree::{Header, IndexNode, Link};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn nested_directory_scenario() {
    let site = Site::new();
    site.write_at("subdir.html", &titled("Subdir"), 10);
    site.write_at("subdir/child.html", &titled("Child"), 20);
    let store = site.open();

    assert_eq!(children(&store, "/"), ids(&["/subdir"]));
    assert_eq!(children(&store, "/subdir"), ids(&["/subdir/child"]));
    assert!(matches!(store.snapshot().get("/subdir/child"), Some(IndexNode::Leaf(_))));

    store
        .create("/subdir/subsubdir/grandchild.html", titled("Grandchild").as_bytes())
        .unwrap();

    let tree = store.snapshot();
    assert_eq!(tree.children("/subdir"), ids(&["/subdir/child", "/subdir/subsubdir"]).as_slice());
    assert_eq!(
        tree.get("/subdir/subsubdir"),
        Some(&IndexNode::Group {
            header: Header::Placeholder {
                name: "subsubdir".to_string(),
                href: "subdir/subsubdir.html".to_string(),
            },
            children: ids(&["/subdir/subsubdir/grandchild"]),
        })
    );
    assert_eq!(
        tree.get("/subdir/subsubdir/grandchild"),
        Some(&IndexNode::Leaf(Link {
            href: "subdir/subsubdir/grandchild.html".to_string(),
            title: "Grandchild".to_string(),
        }))
    );
    assert!(site.artifact_contains(r#"<summary id="/subdir/subsubdir">"#));
    assert!(site.artifact_contains(r#"subsubdir<a class="new-page" href="subdir/subsubdir.html">+</a>"#));
}

#[test]
fn child_creation_promotes_leaf_and_keeps_siblings() {
    let site = Site::new();
    site.write_at("first.html", &titled("First"), 10);
    site.write_at("a.html", &titled("A"), 20);
    site.write_at("last.html", &titled("Last"), 30);
    let store = site.open();
    assert!(matches!(store.snapshot().get("/a"), Some(IndexNode::Leaf(_))));

    store.create("a/b.html", titled("B").as_bytes()).unwrap();

    assert_eq!(children(&store, "/"), ids(&["/first", "/a", "/last"]));
    assert_eq!(
        store.snapshot().get("/a"),
        Some(&IndexNode::Group {
            header: Header::Page(Link {
                href: "a.html".to_string(),
                title: "A".to_string(),
            }),
            children: ids(&["/a/b"]),
        })
    );
}

#[test]
fn deleting_group_document_leaves_placeholder() {
    let site = Site::new();
    site.write_at("a.html", &titled("A"), 10);
    site.write_at("a/b.html", &titled("B"), 20);
    let store = site.open();

    store.delete("/a.html").unwrap();

    assert!(matches!(
        store.snapshot().get("/a"),
        Some(IndexNode::Group { header: Header::Placeholder { name, href }, children })
            if name == "a" && href == "a.html" && children == &ids(&["/a/b"])
    ));
    assert!(site.artifact_contains(r#"a<a class="new-page" href="a.html">+</a>"#));
}

#[test]
fn deleting_document_and_last_child_removes_node() {
    let site = Site::new();
    site.write_at("a.html", &titled("A"), 10);
    site.write_at("a/b.html", &titled("B"), 20);
    site.write_at("other.html", &titled("Other"), 30);
    let store = site.open();

    store.delete("/a.html").unwrap();
    store.delete("/a/b.html").unwrap();

    assert_eq!(children(&store, "/"), ids(&["/other"]));
    assert!(!site.artifact().contains("id=\"/a\""));
}

#[test]
fn deleting_last_child_demotes_group_to_leaf() {
    let site = Site::new();
    site.write_at("a.html", &titled("A"), 10);
    site.write_at("a/b.html", &titled("B"), 20);
    let store = site.open();

    store.delete("/a/b.html").unwrap();

    assert_eq!(
        store.snapshot().get("/a"),
        Some(&IndexNode::Leaf(Link {
            href: "a.html".to_string(),
            title: "A".to_string(),
        }))
    );
    assert!(site.artifact_contains(r#"<div id="/a">"#));
}

#[test]
fn placeholder_regains_title_link_when_document_created() {
    let site = Site::new();
    site.write_at("guide/intro.html", &titled("Intro"), 10);
    let store = site.open();
    assert!(site.artifact_contains(r#"guide<a class="new-page" href="guide.html">+</a>"#));

    store.create("/guide.html", titled("The Guide").as_bytes()).unwrap();

    assert!(matches!(
        store.snapshot().get("/guide"),
        Some(IndexNode::Group { header: Header::Page(link), .. }) if link.title == "The Guide"
    ));
    assert!(site.artifact_contains(r#"<a href="guide.html">The Guide</a>"#));
    assert!(!site.artifact().contains("new-page"));
}

#[test]
fn reserved_names_never_indexed() {
    let site = Site::new();
    let store = site.open();
    for path in ["/template.html", "/header.html", "/footer.html"] {
        store.create(path, b"<p>fragment</p>").unwrap();
    }
    site.write_at("assets/help.html", "help", 10);
    store.resync("/assets/help.html").unwrap();
    store.create("/docs/template.html", titled("Nested Template").as_bytes()).unwrap();

    let tree = store.snapshot();
    assert_eq!(tree.children("/"), ids(&["/docs"]).as_slice());
    for reserved in ["/template", "/header", "/footer", "/assets", "/index", "/home"] {
        assert!(!tree.contains(reserved), "{reserved} indexed");
    }
    assert!(tree.contains("/docs/template"));
}

#[test]
fn directory_named_after_reserved_document_is_indexed() {
    let site = Site::new();
    site.write_at("template.html", &titled("Site Template"), 10);
    let store = site.open();
    assert!(!store.snapshot().contains("/template"));

    store.create("/template/layouts.html", titled("Layouts").as_bytes()).unwrap();
    let tree = store.snapshot();
    assert_eq!(
        tree.get("/template"),
        Some(&IndexNode::Group {
            header: Header::Page(Link {
                href: "template.html".to_string(),
                title: "Site Template".to_string(),
            }),
            children: ids(&["/template/layouts"]),
        })
    );
    assert!(site.artifact_contains(r#"<summary id="/template">"#));
    assert_eq!(store.rebuild().unwrap(), tree.len());
    assert_eq!(store.snapshot(), tree);

    store.delete("/template/layouts.html").unwrap();
    assert!(!store.snapshot().contains("/template"));
    assert!(!site.artifact_contains(r#"<summary id="/template">"#));
}

#[test]
fn non_document_files_do_not_form_groups() {
    let site = Site::new();
    site.write_at("pics.html", &titled("Pictures"), 10);
    let store = site.open();
    store.create("/pics/cat.png", &[0x89, b'P', b'N', b'G']).unwrap();
    assert!(matches!(store.snapshot().get("/pics"), Some(IndexNode::Leaf(_))));
}
