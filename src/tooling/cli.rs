//! CLI Tooling
//!
//! Command-line interface for all content store operations against one content root.

use crate::config::{ConfigLoader, SiteConfig};
use crate::content::{CheckReport, ContentStore};
use crate::logging::LoggingConfig;
use crate::tree::{Direction, Header, IndexNode, IndexTree};
use crate::types::ROOT_ID;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// sitetree - file-backed content store with a self-maintaining navigation index
#[derive(Parser)]
#[command(name = "sitetree")]
#[command(about = "File-backed content store with a self-maintaining navigation index")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Content root directory (overrides configuration)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file path (layered over the global configuration)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new file (content from --from or stdin)
    Create {
        path: String,
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Write a file's content to stdout
    Read { path: String },
    /// Replace an existing file's content (content from --from or stdin)
    Update {
        path: String,
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Delete a file
    Delete { path: String },
    /// Swap an index entry with its previous (up) or next (down) sibling
    Move { target: String, direction: Direction },
    /// Print a document's title
    Title { path: String },
    /// Rebuild the index from a full scan of the content root
    Rebuild,
    /// Repair the index for a file changed outside the store
    Resync { path: String },
    /// Print the navigation tree
    Tree {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Compare the index against the content root
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration
    Config,
}

/// Resolved configuration plus the command dispatcher.
pub struct CliContext {
    config: SiteConfig,
}

impl CliContext {
    /// Load configuration with the CLI root override applied.
    pub fn new(root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path, root.as_deref())
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => ConfigLoader::load(root.as_deref()).context("Failed to load configuration")?,
        };
        Ok(Self { config })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Logging configuration with command-line flags applied. Any flag enables logging.
    pub fn logging_config(&self, cli: &Cli) -> LoggingConfig {
        let mut logging = self.config.logging.clone();
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
            logging.enabled = true;
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
            logging.enabled = true;
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
            logging.enabled = true;
        }
        if let Some(file) = &cli.log_file {
            logging.file = Some(file.clone());
            logging.enabled = true;
        }
        logging
    }

    fn open_store(&self) -> Result<ContentStore> {
        ContentStore::open(&self.config)
            .with_context(|| format!("Failed to open content root {}", self.config.root.display()))
    }

    /// Execute a CLI command, reading document content from `input` when no file is given.
    pub fn execute(&self, command: &Commands, input: &mut dyn Read, out: &mut dyn Write) -> Result<()> {
        match command {
            Commands::Create { path, from } => {
                let content = read_content(from.as_ref(), input)?;
                self.open_store()?
                    .create(path, &content)
                    .with_context(|| format!("Failed to create {}", path))?;
                writeln!(out, "Created {}", path)?;
            }
            Commands::Read { path } => {
                let mut file = self
                    .open_store()?
                    .read(path)
                    .with_context(|| format!("Failed to read {}", path))?;
                io::copy(&mut file, out)?;
            }
            Commands::Update { path, from } => {
                let content = read_content(from.as_ref(), input)?;
                self.open_store()?
                    .update(path, &content)
                    .with_context(|| format!("Failed to update {}", path))?;
                writeln!(out, "Updated {}", path)?;
            }
            Commands::Delete { path } => {
                self.open_store()?
                    .delete(path)
                    .with_context(|| format!("Failed to delete {}", path))?;
                writeln!(out, "Deleted {}", path)?;
            }
            Commands::Move { target, direction } => {
                if self.open_store()?.move_node(target, *direction) {
                    writeln!(out, "Moved {} {}", target, direction)?;
                } else {
                    writeln!(out, "Cannot move {} {}", target, direction)?;
                }
            }
            Commands::Title { path } => {
                let title = self
                    .open_store()?
                    .title(path)
                    .with_context(|| format!("Failed to read title of {}", path))?;
                writeln!(out, "{}", title)?;
            }
            Commands::Rebuild => {
                let nodes = self.open_store()?.rebuild().context("Failed to rebuild index")?;
                writeln!(out, "Rebuilt index: {} nodes", nodes)?;
            }
            Commands::Resync { path } => {
                let changed = self
                    .open_store()?
                    .resync(path)
                    .with_context(|| format!("Failed to resync {}", path))?;
                writeln!(out, "{}", if changed { "Index updated" } else { "Index unchanged" })?;
            }
            Commands::Tree { format } => {
                let tree = self.open_store()?.snapshot();
                match format.as_str() {
                    "json" => writeln!(out, "{}", serde_json::to_string_pretty(&tree_json(&tree, ROOT_ID))?)?,
                    "text" => out.write_all(format_tree_text(&tree).as_bytes())?,
                    other => bail!("Invalid format '{}': expected text or json", other),
                }
            }
            Commands::Check { format } => {
                let store = self.open_store()?;
                let report = store.check().context("Failed to check index")?;
                match format.as_str() {
                    "json" => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
                    "text" => {
                        let written = fs::metadata(store.index_path())
                            .and_then(|m| m.modified())
                            .ok()
                            .map(DateTime::<Utc>::from);
                        out.write_all(format_check_text(&report, written).as_bytes())?;
                    }
                    other => bail!("Invalid format '{}': expected text or json", other),
                }
                if !report.is_clean() {
                    bail!("Index is out of date; run `sitetree rebuild`");
                }
            }
            Commands::Config => {
                let rendered = toml::to_string_pretty(&self.config).context("Failed to render configuration")?;
                out.write_all(rendered.as_bytes())?;
            }
        }
        Ok(())
    }
}

fn read_content(from: Option<&PathBuf>, input: &mut dyn Read) -> Result<Vec<u8>> {
    match from {
        Some(path) => fs::read(path).with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut content = Vec::new();
            input.read_to_end(&mut content).context("Failed to read stdin")?;
            Ok(content)
        }
    }
}

fn format_tree_text(tree: &IndexTree) -> String {
    let mut out = String::new();
    for (depth, _, node) in tree.walk() {
        let line = match node {
            IndexNode::Leaf(link) => format!("{} ({})", link.title, link.href),
            IndexNode::Group { header: Header::Page(link), .. } => format!("{} ({})", link.title, link.href),
            IndexNode::Group {
                header: Header::Placeholder { name, href },
                ..
            } => format!("{} [+ {}]", name, href),
        };
        out.push_str(&"  ".repeat(depth));
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn tree_json(tree: &IndexTree, id: &str) -> serde_json::Value {
    match tree.get(id) {
        Some(IndexNode::Leaf(link)) => json!({
            "id": id,
            "kind": "leaf",
            "link": link,
        }),
        Some(IndexNode::Group { header, children }) => json!({
            "id": id,
            "kind": "group",
            "header": header,
            "children": children.iter().map(|child| tree_json(tree, child)).collect::<Vec<_>>(),
        }),
        None => serde_json::Value::Null,
    }
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_check_text(report: &CheckReport, written: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Index")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Nodes", "Groups", "Leaves", "Placeholders", "Last written"]);
    table.add_row(vec![
        report.nodes.to_string(),
        report.groups.to_string(),
        report.leaves.to_string(),
        report.placeholders.to_string(),
        written.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string()),
    ]);
    out.push_str(&format!("{}\n\n", table));

    if report.is_clean() {
        out.push_str(&format!("{}\n", "Index matches the content root".green()));
        return out;
    }
    for problem in &report.problems {
        out.push_str(&format!("{} {}\n", "problem:".red(), problem));
    }
    for id in &report.missing {
        out.push_str(&format!("{} {}\n", "missing:".yellow(), id));
    }
    for id in &report.stale {
        out.push_str(&format!("{} {}\n", "stale:".yellow(), id));
    }
    out
}
