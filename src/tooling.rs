//! Tooling & Integration Layer
//!
//! Command-line front end over [`crate::content::ContentStore`]. The HTTP layer and
//! editors consume the library directly; the CLI covers scripting and maintenance.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
