//! `palletrack-core`: shared building blocks for the warehouse domain.
//!
//! Identifiers, the domain error taxonomy and the aggregate contract. No IO.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod quantity;

pub use aggregate::Aggregate;
pub use error::{DomainError, DomainResult};
pub use id::{CatalogEntryId, RecordId, SlotId};
pub use quantity::{canonical_code, saturating_total};
