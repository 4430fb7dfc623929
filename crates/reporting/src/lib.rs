//! Read-only views over the warehouse.
//!
//! Every report is recomputed from the current state on each call; nothing is
//! cached between reads.

pub mod dashboard;
pub mod layout;
pub mod summary;

pub use dashboard::{CategoryCount, DashboardStats, dashboard};
pub use layout::{AisleView, LevelView, MapCell, PositionRow, position_report, warehouse_map};
pub use summary::{LotSummary, SkuSummary, stock_summary};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use palletrack_catalog::Category;
    use palletrack_core::{RecordId, SlotId};
    use palletrack_inventory::{ReceiptLine, Warehouse};
    use palletrack_locations::SlotRange;

    pub fn line(sku: &str, category: Category, lot: &str, slot: &str, quantity: u64) -> ReceiptLine {
        ReceiptLine {
            sku: sku.to_string(),
            name: format!("{sku} name"),
            category,
            quantity,
            lot_number: lot.to_string(),
            slot_id: SlotId::new(slot),
            image_url: None,
        }
    }

    /// Two aisles, two slots, three levels; four records received on
    /// consecutive days.
    pub fn warehouse() -> Warehouse {
        let mut wh = Warehouse::new();
        for aisle in ["1", "2"] {
            wh.add_slot_range(SlotRange::new("R", aisle, 1..=2, 1..=3).unwrap())
                .unwrap();
        }
        let receipts = [
            line("SOY-900", Category::Oil, "L1", "R1.01.001", 5),
            line("SOY-900", Category::Oil, "L1", "R1.02.001", 3),
            line("SOY-900", Category::Oil, "L2", "R2.01.003", 8),
            line("FLR-25", Category::Sacks, "F1", "R2.02.001", 40),
        ];
        for (day, receipt) in (1..).zip(receipts) {
            let at = Utc.with_ymd_and_hms(2024, 4, day, 8, 0, 0).unwrap();
            wh.receive_at(RecordId::new(), receipt, at).unwrap();
        }
        wh
    }

    /// One lot holding `u64::MAX` units at one slot and one more at the next.
    pub fn brim_full() -> Warehouse {
        let mut wh = Warehouse::new();
        wh.add_slot_range(SlotRange::new("R", "1", 1..=2, 1..=1).unwrap())
            .unwrap();
        wh.receive(line("SOY-900", Category::Oil, "L1", "R1.01.001", u64::MAX))
            .unwrap();
        wh.receive(line("SOY-900", Category::Oil, "L1", "R1.02.001", 1))
            .unwrap();
        wh
    }
}
