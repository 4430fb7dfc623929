use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use palletrack_catalog::{CatalogEntry, Category};
use palletrack_core::{RecordId, SlotId, canonical_code};

/// A quantity of one SKU/lot stored at one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    id: RecordId,
    sku: String,
    name: String,
    category: Category,
    quantity: u64,
    lot_number: String,
    entry_date: NaiveDate,
    slot_id: SlotId,
    image_url: Option<String>,
}

impl StockRecord {
    pub(crate) fn from_receipt(id: RecordId, line: &ReceiptLine, entry_date: NaiveDate) -> Self {
        Self {
            id,
            sku: canonical_code(&line.sku).to_string(),
            name: canonical_code(&line.name).to_string(),
            category: line.category,
            quantity: line.quantity,
            lot_number: canonical_code(&line.lot_number).to_string(),
            entry_date,
            slot_id: line.slot_id.clone(),
            image_url: line.image_url.clone(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn lot_number(&self) -> &str {
        &self.lot_number
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn slot_id(&self) -> &SlotId {
        &self.slot_id
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Whether this record holds the given SKU and lot. Surrounding
    /// whitespace in the arguments is ignored.
    pub fn is_lot(&self, sku: &str, lot_number: &str) -> bool {
        self.sku == canonical_code(sku) && self.lot_number == canonical_code(lot_number)
    }

    /// Whether this record holds `sku`, ignoring surrounding whitespace.
    pub fn is_sku(&self, sku: &str) -> bool {
        self.sku == canonical_code(sku)
    }

    pub(crate) fn add(&mut self, quantity: u64) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Decrement the balance and return what is left.
    pub(crate) fn take(&mut self, quantity: u64) -> u64 {
        self.quantity = self.quantity.saturating_sub(quantity);
        self.quantity
    }
}

/// One goods-receipt line, as entered by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub sku: String,
    pub name: String,
    pub category: Category,
    pub quantity: u64,
    pub lot_number: String,
    pub slot_id: SlotId,
    pub image_url: Option<String>,
}

impl ReceiptLine {
    /// Pre-fill a receipt from a catalog entry.
    pub fn from_catalog(
        entry: &CatalogEntry,
        quantity: u64,
        lot_number: impl Into<String>,
        slot_id: SlotId,
    ) -> Self {
        Self {
            sku: entry.sku().to_string(),
            name: entry.name().to_string(),
            category: entry.category(),
            quantity,
            lot_number: lot_number.into(),
            slot_id,
            image_url: entry.image_url().map(str::to_string),
        }
    }
}
