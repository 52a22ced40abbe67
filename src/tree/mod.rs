//! Navigation Tree
//!
//! In-memory model of the site index: an arena of [`IndexNode`]s keyed by id, plus the
//! full-scan [`TreeBuilder`] that derives it from the content root.

mod arena;
mod builder;
mod node;

pub use arena::IndexTree;
pub use builder::TreeBuilder;
pub use node::{Header, IndexNode, Link};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structural errors raised when a mutation would break the arena invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Unknown parent: {0}")]
    UnknownParent(String),

    #[error("Parent is not a group: {0}")]
    NotAGroup(String),

    #[error("Node inserted with children: {0}")]
    ChildrenNotEmpty(String),
}

/// Direction of a sibling swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("Invalid direction '{}': expected up or down", other)),
        }
    }
}
