//! Storage slot registry.
//!
//! Owns the set of storage positions, their deterministic ids and ordering,
//! and the occupancy flag each slot carries. Deciding *when* a slot becomes
//! occupied is the inventory crate's job; this crate only records it.

pub mod address;
pub mod registry;
pub mod slot;

pub use address::{NaturalKey, SlotAddress, SlotRange, SlotSortKey};
pub use registry::SlotRegistry;
pub use slot::Slot;
