use serde::{Deserialize, Serialize};

use palletrack_core::SlotId;
use palletrack_inventory::Ledger;

/// One lot of a SKU with its balance summed across slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSummary {
    pub lot_number: String,
    pub quantity: u64,
    /// Slots holding the lot, in ledger order.
    pub positions: Vec<SlotId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuSummary {
    pub sku: String,
    pub name: String,
    pub total_quantity: u64,
    /// Lots in first-seen order.
    pub lots: Vec<LotSummary>,
}

/// Group the ledger by SKU, then lot. SKUs come out in ascending order.
pub fn stock_summary(ledger: &Ledger) -> Vec<SkuSummary> {
    let mut summaries: Vec<SkuSummary> = Vec::new();

    for record in ledger.records() {
        let at = match summaries.iter().position(|s| s.sku == record.sku()) {
            Some(at) => at,
            None => {
                summaries.push(SkuSummary {
                    sku: record.sku().to_string(),
                    name: record.name().to_string(),
                    total_quantity: 0,
                    lots: Vec::new(),
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[at];
        summary.total_quantity = summary.total_quantity.saturating_add(record.quantity());

        match summary
            .lots
            .iter_mut()
            .find(|l| l.lot_number == record.lot_number())
        {
            Some(lot) => {
                lot.quantity = lot.quantity.saturating_add(record.quantity());
                lot.positions.push(record.slot_id().clone());
            }
            None => summary.lots.push(LotSummary {
                lot_number: record.lot_number().to_string(),
                quantity: record.quantity(),
                positions: vec![record.slot_id().clone()],
            }),
        }
    }

    summaries.sort_by(|a, b| a.sku.cmp(&b.sku));
    summaries
}
