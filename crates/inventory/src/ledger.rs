use serde::{Deserialize, Serialize};

use palletrack_core::{RecordId, SlotId, saturating_total};

use crate::record::StockRecord;

/// All stock records, in the order they were first received.
///
/// At most one record exists per (SKU, slot, lot). Mutation is reserved to
/// [`Warehouse`](crate::Warehouse), which keeps slot occupancy in step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<StockRecord>,
}

/// A distinct (SKU, lot) pair with its total balance across slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotGroup {
    pub sku: String,
    pub name: String,
    pub lot_number: String,
    pub total_quantity: u64,
    pub slot_count: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&StockRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// The record for an exact (SKU, slot, lot) triple, if any.
    pub fn find_exact(&self, sku: &str, slot_id: &SlotId, lot_number: &str) -> Option<&StockRecord> {
        self.records
            .iter()
            .find(|r| r.slot_id() == slot_id && r.is_lot(sku, lot_number))
    }

    /// The record holding `sku` at `slot_id` (dispatch lookup).
    pub fn find_at(&self, sku: &str, slot_id: &SlotId) -> Option<&StockRecord> {
        self.records
            .iter()
            .find(|r| r.is_sku(sku) && r.slot_id() == slot_id)
    }

    pub fn records_at<'a>(&'a self, slot_id: &'a SlotId) -> impl Iterator<Item = &'a StockRecord> + 'a {
        self.records.iter().filter(move |r| r.slot_id() == slot_id)
    }

    /// Whether any record references `slot_id`. This is the authoritative
    /// occupancy test.
    pub fn holds_stock(&self, slot_id: &SlotId) -> bool {
        self.records.iter().any(|r| r.slot_id() == slot_id)
    }

    pub fn lot_records<'a>(
        &'a self,
        sku: &'a str,
        lot_number: &'a str,
    ) -> impl Iterator<Item = &'a StockRecord> + 'a {
        self.records.iter().filter(move |r| r.is_lot(sku, lot_number))
    }

    pub fn total_units(&self) -> u64 {
        saturating_total(self.records.iter().map(StockRecord::quantity))
    }

    /// Records whose SKU, name, slot id or lot contains `query`, ignoring case.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a StockRecord> + 'a {
        let needle = query.trim().to_lowercase();
        self.records.iter().filter(move |r| {
            [r.sku(), r.name(), r.slot_id().as_str(), r.lot_number()]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
    }

    /// Distinct (SKU, lot) pairs whose SKU, name or lot contains `query`,
    /// in first-seen order, with balances summed across slots.
    pub fn lot_groups(&self, query: &str) -> Vec<LotGroup> {
        let needle = query.trim().to_lowercase();
        let mut groups: Vec<LotGroup> = Vec::new();

        for record in &self.records {
            if let Some(group) = groups
                .iter_mut()
                .find(|g| g.sku == record.sku() && g.lot_number == record.lot_number())
            {
                group.total_quantity = group.total_quantity.saturating_add(record.quantity());
                group.slot_count += 1;
                continue;
            }
            groups.push(LotGroup {
                sku: record.sku().to_string(),
                name: record.name().to_string(),
                lot_number: record.lot_number().to_string(),
                total_quantity: record.quantity(),
                slot_count: 1,
            });
        }

        groups.retain(|g| {
            [g.sku.as_str(), g.name.as_str(), g.lot_number.as_str()]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
        groups
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut StockRecord> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    pub(crate) fn insert(&mut self, record: StockRecord) {
        self.records.push(record);
    }

    pub(crate) fn remove(&mut self, id: RecordId) -> Option<StockRecord> {
        let at = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(at))
    }
}
