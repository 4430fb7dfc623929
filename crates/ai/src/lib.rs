//! `palletrack-ai`
//!
//! **Responsibility:** optional storage-slot suggestion boundary.
//!
//! An advisor only proposes a free slot; it never mutates the warehouse. A
//! failed, slow or nonsensical suggestion is logged and dropped, so callers
//! can always fall back to choosing a slot by hand.

pub mod advisor;
pub mod heuristic;
pub mod result;

pub use advisor::{FreeSlot, StorageAdvisor, SuggestionRequest, suggest_storage};
pub use heuristic::HeuristicAdvisor;
pub use result::{AiError, StorageSuggestion};
