use serde::{Deserialize, Serialize};

use palletrack_core::SlotId;
use palletrack_inventory::{StockRecord, Warehouse};
use palletrack_locations::SlotRegistry;

/// One slot with whatever is stored there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRow {
    pub slot_id: SlotId,
    pub aisle: String,
    pub slot: u32,
    pub level: u32,
    pub occupied: bool,
    pub records: Vec<StockRecord>,
}

/// Every slot in sorted order.
pub fn position_report(warehouse: &Warehouse) -> Vec<PositionRow> {
    warehouse
        .slots()
        .iter()
        .map(|slot| PositionRow {
            slot_id: slot.id().clone(),
            aisle: slot.aisle().to_string(),
            slot: slot.slot_number(),
            level: slot.level(),
            occupied: slot.is_occupied(),
            records: warehouse.ledger().records_at(slot.id()).cloned().collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCell {
    pub slot_id: SlotId,
    pub slot: u32,
    pub occupied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelView {
    pub level: u32,
    pub cells: Vec<MapCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AisleView {
    pub aisle: String,
    /// Top level first.
    pub levels: Vec<LevelView>,
}

/// Lay slots out by aisle (natural order) and level (highest first).
pub fn warehouse_map(registry: &SlotRegistry) -> Vec<AisleView> {
    registry
        .aisles()
        .into_iter()
        .map(|aisle| {
            let mut levels: Vec<u32> = registry
                .iter()
                .filter(|s| s.aisle() == aisle)
                .map(|s| s.level())
                .collect();
            levels.sort_unstable_by(|a, b| b.cmp(a));
            levels.dedup();

            let levels = levels
                .into_iter()
                .map(|level| LevelView {
                    level,
                    cells: registry
                        .iter()
                        .filter(|s| s.aisle() == aisle && s.level() == level)
                        .map(|s| MapCell {
                            slot_id: s.id().clone(),
                            slot: s.slot_number(),
                            occupied: s.is_occupied(),
                        })
                        .collect(),
                })
                .collect();

            AisleView {
                aisle: aisle.to_string(),
                levels,
            }
        })
        .collect()
}
