//! Index Store
//!
//! Persists the navigation tree as the index artifact at the content root. The
//! artifact is always replaced as a whole; a tree is never partially written.

pub mod markup;
pub mod persistence;

pub use persistence::HtmlIndexStore;

use crate::error::StoreError;
use crate::tree::IndexTree;

/// Index artifact storage interface
pub trait IndexStore: Send + Sync {
    /// Load the persisted tree. `Ok(None)` when no artifact exists yet.
    fn load(&self) -> Result<Option<IndexTree>, StoreError>;

    /// Replace the persisted tree.
    fn write(&self, tree: &IndexTree) -> Result<(), StoreError>;
}
