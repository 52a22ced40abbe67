use crate::integration::support::{titled, Site};
use clap::Parser;
use sitetree::tooling::cli::{Cli, CliContext, Commands};
use std::fs;
use std::io::Cursor;

fn context(site: &Site) -> CliContext {
    let config = site.root().join("sitetree.toml");
    fs::write(&config, "index_title = \"Contents\"\nassets_dir = \"static\"\n").unwrap();
    CliContext::new(Some(site.root().to_path_buf()), Some(config)).unwrap()
}

fn execute(ctx: &CliContext, command: &Commands, stdin: &str) -> anyhow::Result<String> {
    let mut input = Cursor::new(stdin.as_bytes().to_vec());
    let mut out = Vec::new();
    ctx.execute(command, &mut input, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["sitetree", "create", "/a.html"],
        vec!["sitetree", "create", "a.html", "--from", "draft.html"],
        vec!["sitetree", "read", "a.html"],
        vec!["sitetree", "update", "/a.html", "--from", "draft.html"],
        vec!["sitetree", "delete", "/a.html"],
        vec!["sitetree", "move", "/a", "down"],
        vec!["sitetree", "title", "/a.html"],
        vec!["sitetree", "rebuild"],
        vec!["sitetree", "resync", "/a.html"],
        vec!["sitetree", "tree", "--format", "json"],
        vec!["sitetree", "check"],
        vec!["sitetree", "--root", "/srv/site", "--log-level", "debug", "config"],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(args.clone()).is_ok(), "failed to parse {:?}", args);
    }
}

#[test]
fn parse_invalid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["sitetree"],
        vec!["sitetree", "move", "/a"],
        vec!["sitetree", "move", "/a", "sideways"],
        vec!["sitetree", "create"],
        vec!["sitetree", "frobnicate"],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(args.clone()).is_err(), "unexpectedly parsed {:?}", args);
    }
}

#[test]
fn config_file_settings_reach_the_artifact() {
    let site = Site::new();
    let ctx = context(&site);
    assert_eq!(ctx.config().index_title, "Contents");

    execute(&ctx, &Commands::Rebuild, "").unwrap();
    assert!(site.artifact_contains("<title>Contents</title>"));
    assert!(site.artifact_contains(r#"<script src="static/index.js"></script>"#));

    let err = execute(
        &ctx,
        &Commands::Create {
            path: "/static/app.js".to_string(),
            from: None,
        },
        "x",
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Forbidden path"));
}

#[test]
fn create_from_stdin_and_file() {
    let site = Site::new();
    let ctx = context(&site);
    execute(
        &ctx,
        &Commands::Create {
            path: "/stdin.html".to_string(),
            from: None,
        },
        &titled("From Stdin"),
    )
    .unwrap();

    let draft = site.root().join("draft.txt");
    fs::write(&draft, titled("From File")).unwrap();
    execute(
        &ctx,
        &Commands::Create {
            path: "/file.html".to_string(),
            from: Some(draft),
        },
        "",
    )
    .unwrap();

    let read = execute(&ctx, &Commands::Read { path: "file.html".to_string() }, "").unwrap();
    assert_eq!(read, titled("From File"));
    let title = execute(&ctx, &Commands::Title { path: "/stdin.html".to_string() }, "").unwrap();
    assert_eq!(title.trim(), "From Stdin");
}

#[test]
fn tree_json_contract_has_required_fields() {
    let site = Site::new();
    site.write_at("docs/guide.html", &titled("Guide"), 10);
    let ctx = context(&site);

    let output = execute(&ctx, &Commands::Tree { format: "json".to_string() }, "").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["id"], "/");
    assert_eq!(parsed["kind"], "group");
    assert_eq!(parsed["header"]["kind"], "page");
    assert_eq!(parsed["header"]["title"], "Home");

    let docs = &parsed["children"][0];
    assert_eq!(docs["id"], "/docs");
    assert_eq!(docs["header"]["kind"], "placeholder");
    assert_eq!(docs["header"]["name"], "docs");
    assert_eq!(docs["children"][0]["kind"], "leaf");
    assert_eq!(docs["children"][0]["link"]["href"], "docs/guide.html");
}

#[test]
fn check_json_contract_has_required_fields() {
    let site = Site::new();
    site.write_at("a.html", &titled("A"), 10);
    let ctx = context(&site);

    let output = execute(&ctx, &Commands::Check { format: "json".to_string() }, "").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    for field in ["nodes", "groups", "leaves", "placeholders"] {
        assert!(parsed.get(field).and_then(|v| v.as_u64()).is_some(), "{field}");
    }
    for field in ["problems", "missing", "stale"] {
        assert!(parsed.get(field).and_then(|v| v.as_array()).is_some(), "{field}");
    }
    assert_eq!(parsed["nodes"], 2);
}

#[test]
fn move_reports_outcome() {
    let site = Site::new();
    site.write_at("a.html", &titled("A"), 10);
    site.write_at("b.html", &titled("B"), 20);
    let ctx = context(&site);

    let moved = execute(
        &ctx,
        &Commands::Move {
            target: "/b".to_string(),
            direction: sitetree::Direction::Up,
        },
        "",
    )
    .unwrap();
    assert_eq!(moved.trim(), "Moved /b up");

    let stuck = execute(
        &ctx,
        &Commands::Move {
            target: "/b".to_string(),
            direction: sitetree::Direction::Up,
        },
        "",
    )
    .unwrap();
    assert_eq!(stuck.trim(), "Cannot move /b up");
}
