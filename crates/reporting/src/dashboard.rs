use serde::{Deserialize, Serialize};

use palletrack_catalog::Category;
use palletrack_core::saturating_total;
use palletrack_inventory::{StockRecord, Warehouse};

/// Records and units held for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub records: usize,
    pub units: u64,
}

/// Headline numbers for the overview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_positions: usize,
    pub occupied_positions: usize,
    pub free_positions: usize,
    /// Occupied share of all positions, rounded to a whole percent.
    pub occupancy_percent: u32,
    pub total_units: u64,
    /// The last `recent` records received, newest first.
    pub recent_entries: Vec<StockRecord>,
    /// One entry per category, in [`Category::ALL`] order.
    pub categories: Vec<CategoryCount>,
}

pub fn dashboard(warehouse: &Warehouse, recent: usize) -> DashboardStats {
    let slots = warehouse.slots();
    let ledger = warehouse.ledger();

    let total_positions = slots.len();
    let occupied_positions = slots.occupied_count();

    let categories = Category::ALL
        .into_iter()
        .map(|category| {
            let held = ledger.records().iter().filter(|r| r.category() == category);
            CategoryCount {
                category,
                records: held.clone().count(),
                units: saturating_total(held.map(StockRecord::quantity)),
            }
        })
        .collect();

    DashboardStats {
        total_positions,
        occupied_positions,
        free_positions: total_positions - occupied_positions,
        occupancy_percent: percent(occupied_positions, total_positions),
        total_units: ledger.total_units(),
        recent_entries: ledger.records().iter().rev().take(recent).cloned().collect(),
        categories,
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 100 + whole / 2) / whole) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn counts_positions_units_and_categories() {
        let wh = fixtures::warehouse();
        let stats = dashboard(&wh, 5);

        assert_eq!(stats.total_positions, 12);
        assert_eq!(stats.occupied_positions, 4);
        assert_eq!(stats.free_positions, 8);
        assert_eq!(stats.occupancy_percent, 33);
        assert_eq!(stats.total_units, 56);

        assert_eq!(
            stats.categories,
            vec![
                CategoryCount { category: Category::Sacks, records: 1, units: 40 },
                CategoryCount { category: Category::Oil, records: 3, units: 16 },
                CategoryCount { category: Category::Milk, records: 0, units: 0 },
            ]
        );
    }

    #[test]
    fn recent_entries_are_newest_first() {
        let wh = fixtures::warehouse();
        let stats = dashboard(&wh, 2);

        let skus: Vec<(&str, &str)> = stats
            .recent_entries
            .iter()
            .map(|r| (r.sku(), r.lot_number()))
            .collect();
        assert_eq!(skus, vec![("FLR-25", "F1"), ("SOY-900", "L2")]);
    }

    #[test]
    fn unit_totals_saturate_instead_of_wrapping() {
        let stats = dashboard(&fixtures::brim_full(), 5);

        assert_eq!(stats.total_units, u64::MAX);
        assert_eq!(stats.categories[1].category, Category::Oil);
        assert_eq!(stats.categories[1].units, u64::MAX);
    }

    #[test]
    fn empty_warehouse_reports_zero_percent() {
        let stats = dashboard(&Warehouse::new(), 5);
        assert_eq!(stats.total_positions, 0);
        assert_eq!(stats.occupancy_percent, 0);
        assert!(stats.recent_entries.is_empty());
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 5), 100);
    }
}
