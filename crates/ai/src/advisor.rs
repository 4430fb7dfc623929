use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use palletrack_catalog::Category;
use palletrack_core::SlotId;
use palletrack_locations::{Slot, SlotRegistry};

use crate::result::{AiError, StorageSuggestion};

/// A free slot offered to an advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub slot_id: SlotId,
    pub aisle: String,
    pub slot: u32,
    pub level: u32,
}

impl From<&Slot> for FreeSlot {
    fn from(slot: &Slot) -> Self {
        Self {
            slot_id: slot.id().clone(),
            aisle: slot.aisle().to_string(),
            slot: slot.slot_number(),
            level: slot.level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub product_name: String,
    pub category: Category,
    /// Candidate slots in registry order.
    pub free_slots: Vec<FreeSlot>,
}

impl SuggestionRequest {
    pub fn new(product_name: impl Into<String>, category: Category, registry: &SlotRegistry) -> Self {
        Self {
            product_name: product_name.into(),
            category,
            free_slots: registry.free_slots().map(FreeSlot::from).collect(),
        }
    }

    pub fn offers(&self, slot_id: &SlotId) -> bool {
        self.free_slots.iter().any(|s| &s.slot_id == slot_id)
    }
}

/// Something that can propose a storage slot for incoming goods.
///
/// Implementations must not assume they are awaited to completion; the caller
/// may drop the future on timeout.
#[async_trait]
pub trait StorageAdvisor: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<StorageSuggestion, AiError>;
}

/// Ask `advisor` where to store a product.
///
/// Returns `None` when there is no free slot, when the advisor fails or runs
/// past `timeout`, or when it names a slot that was not offered.
pub async fn suggest_storage<A>(
    advisor: &A,
    registry: &SlotRegistry,
    product_name: &str,
    category: Category,
    timeout: Duration,
) -> Option<StorageSuggestion>
where
    A: StorageAdvisor + ?Sized,
{
    let request = SuggestionRequest::new(product_name, category, registry);
    if request.free_slots.is_empty() {
        tracing::debug!(product = product_name, "no free slot to suggest");
        return None;
    }

    let answer = match tokio::time::timeout(timeout, advisor.suggest(&request)).await {
        Ok(answer) => answer,
        Err(_) => Err(AiError::Timeout(timeout)),
    };

    let suggestion = match answer {
        Ok(suggestion) => suggestion,
        Err(err) => {
            tracing::warn!(error = %err, product = product_name, "storage suggestion unavailable");
            return None;
        }
    };

    if !request.offers(&suggestion.suggested_position) {
        tracing::warn!(
            suggested = %suggestion.suggested_position,
            product = product_name,
            "advisor suggested a slot that is not free"
        );
        return None;
    }

    tracing::info!(
        suggested = %suggestion.suggested_position,
        product = product_name,
        category = %category,
        "storage suggestion received"
    );
    Some(suggestion)
}
