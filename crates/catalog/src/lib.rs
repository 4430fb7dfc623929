//! Product catalog.
//!
//! Known product definitions (SKU → descriptive metadata) used to pre-fill
//! goods receipts. Entries are immutable once registered.

pub mod catalog;
pub mod entry;

pub use catalog::{Catalog, CatalogMatches};
pub use entry::{CatalogEntry, Category};
