//! sitetree: File-Backed Content Store
//!
//! Stores user-edited documents under a content root and keeps a navigable index
//! artifact synchronized with the directory tree, repairing only the part of the
//! index a change affects.

pub mod config;
pub mod content;
pub mod error;
pub mod layout;
pub mod logging;
pub mod paths;
pub mod store;
pub mod sync;
pub mod title;
pub mod tooling;
pub mod tree;
pub mod types;

pub use content::ContentStore;
pub use error::StoreError;
pub use tree::Direction;
