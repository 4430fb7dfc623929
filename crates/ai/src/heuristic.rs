use async_trait::async_trait;

use palletrack_catalog::Category;

use crate::advisor::{FreeSlot, StorageAdvisor, SuggestionRequest};
use crate::result::{AiError, StorageSuggestion};

/// Local, deterministic advisor.
///
/// Heavy goods (sacks) go to the lowest free level; everything else goes to
/// the first free slot of the first aisle, which is closest to the exit.
/// Ties keep registry order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAdvisor;

impl HeuristicAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn pick(request: &SuggestionRequest) -> Option<(&FreeSlot, String)> {
        match request.category {
            Category::Sacks => request
                .free_slots
                .iter()
                .enumerate()
                .min_by_key(|(at, slot)| (slot.level, *at))
                .map(|(_, slot)| {
                    (slot, format!("heavy goods go low: level {} is the lowest free level", slot.level))
                }),
            Category::Oil | Category::Milk => request.free_slots.first().map(|slot| {
                (slot, format!("fast movers go near the exit: first free slot in aisle {}", slot.aisle))
            }),
        }
    }
}

#[async_trait]
impl StorageAdvisor for HeuristicAdvisor {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<StorageSuggestion, AiError> {
        let (slot, reason) = Self::pick(request)
            .ok_or_else(|| AiError::InvalidInput("no free slot offered".to_string()))?;
        Ok(StorageSuggestion::new(slot.slot_id.clone(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use palletrack_core::{RecordId, SlotId};
    use palletrack_locations::{SlotRange, SlotRegistry};

    use crate::advisor::suggest_storage;

    fn registry() -> SlotRegistry {
        let mut registry = SlotRegistry::new();
        for aisle in ["2", "1"] {
            registry.add_slot_range(&SlotRange::new("R", aisle, 1..=2, 1..=3).unwrap());
        }
        registry
    }

    fn request(category: Category, registry: &SlotRegistry) -> SuggestionRequest {
        SuggestionRequest::new("Test product", category, registry)
    }

    #[tokio::test]
    async fn sacks_go_to_the_lowest_level() {
        let mut registry = registry();
        // Fill the ground level of aisle 1 except slot 2.
        registry.set_occupancy(&SlotId::new("R1.01.001"), Some(RecordId::new())).unwrap();

        let suggestion = HeuristicAdvisor
            .suggest(&request(Category::Sacks, &registry))
            .await
            .unwrap();
        assert_eq!(suggestion.suggested_position, SlotId::new("R1.02.001"));
    }

    #[tokio::test]
    async fn other_goods_take_the_first_aisle() {
        let mut registry = registry();
        registry.set_occupancy(&SlotId::new("R1.01.001"), Some(RecordId::new())).unwrap();

        let suggestion = HeuristicAdvisor
            .suggest(&request(Category::Milk, &registry))
            .await
            .unwrap();
        assert_eq!(suggestion.suggested_position, SlotId::new("R1.01.002"));
    }

    #[tokio::test]
    async fn empty_request_is_invalid_input() {
        let err = HeuristicAdvisor
            .suggest(&request(Category::Oil, &SlotRegistry::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn heuristic_suggestions_pass_the_free_slot_check() {
        let registry = registry();
        let suggestion = suggest_storage(
            &HeuristicAdvisor::new(),
            &registry,
            "Wheat flour",
            Category::Sacks,
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(suggestion.suggested_position, SlotId::new("R1.01.001"));
    }
}
