use chrono::{DateTime, Utc};

use palletrack_catalog::{Catalog, CatalogEntry};
use palletrack_core::{Aggregate, DomainError, DomainResult, RecordId, SlotId, canonical_code};
use palletrack_events::Event;
use palletrack_locations::{Slot, SlotAddress, SlotRange, SlotRegistry};

use crate::ledger::Ledger;
use crate::record::{ReceiptLine, StockRecord};

/// The warehouse store: slot registry, catalog and ledger behind one owner.
///
/// Reads go through [`Warehouse::slots`], [`Warehouse::catalog`] and
/// [`Warehouse::ledger`]; writes go through the command methods below, each of
/// which validates fully before changing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warehouse {
    slots: SlotRegistry,
    catalog: Catalog,
    ledger: Ledger,
    version: u64,
}

/// Command: AddSlot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSlot {
    pub address: SlotAddress,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddSlotRange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSlotRange {
    pub range: SlotRange,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteSlot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSlot {
    pub slot_id: SlotId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RegisterCatalogEntry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCatalogEntry {
    pub entry: CatalogEntry,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReceiveGoods.
///
/// `record_id` is used only if the receipt opens a new record; a merge keeps
/// the existing record's id. The entry date is the calendar date of
/// `occurred_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveGoods {
    pub record_id: RecordId,
    pub line: ReceiptLine,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DispatchGoods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchGoods {
    pub sku: String,
    pub slot_id: SlotId,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveRecord (zero out a lot at a position).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRecord {
    pub record_id: RecordId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseCommand {
    AddSlot(AddSlot),
    AddSlotRange(AddSlotRange),
    DeleteSlot(DeleteSlot),
    RegisterCatalogEntry(RegisterCatalogEntry),
    ReceiveGoods(ReceiveGoods),
    DispatchGoods(DispatchGoods),
    RemoveRecord(RemoveRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseEvent {
    SlotAdded {
        slot: Slot,
        occurred_at: DateTime<Utc>,
    },
    SlotRangeAdded {
        slots: Vec<Slot>,
        occurred_at: DateTime<Utc>,
    },
    SlotDeleted {
        slot_id: SlotId,
        occurred_at: DateTime<Utc>,
    },
    CatalogEntryRegistered {
        entry: CatalogEntry,
        occurred_at: DateTime<Utc>,
    },
    /// A receipt opened a new record.
    StockReceived {
        record: StockRecord,
        occurred_at: DateTime<Utc>,
    },
    /// A receipt matched an existing (SKU, slot, lot) record.
    StockMerged {
        record_id: RecordId,
        quantity: u64,
        occurred_at: DateTime<Utc>,
    },
    /// Units left a record; a record that reaches zero is removed.
    StockDispatched {
        record_id: RecordId,
        quantity: u64,
        occurred_at: DateTime<Utc>,
    },
    RecordRemoved {
        record_id: RecordId,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for WarehouseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WarehouseEvent::SlotAdded { .. } => "locations.slot.added",
            WarehouseEvent::SlotRangeAdded { .. } => "locations.slot_range.added",
            WarehouseEvent::SlotDeleted { .. } => "locations.slot.deleted",
            WarehouseEvent::CatalogEntryRegistered { .. } => "catalog.entry.registered",
            WarehouseEvent::StockReceived { .. } => "inventory.stock.received",
            WarehouseEvent::StockMerged { .. } => "inventory.stock.merged",
            WarehouseEvent::StockDispatched { .. } => "inventory.stock.dispatched",
            WarehouseEvent::RecordRemoved { .. } => "inventory.record.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            WarehouseEvent::SlotAdded { occurred_at, .. }
            | WarehouseEvent::SlotRangeAdded { occurred_at, .. }
            | WarehouseEvent::SlotDeleted { occurred_at, .. }
            | WarehouseEvent::CatalogEntryRegistered { occurred_at, .. }
            | WarehouseEvent::StockReceived { occurred_at, .. }
            | WarehouseEvent::StockMerged { occurred_at, .. }
            | WarehouseEvent::StockDispatched { occurred_at, .. }
            | WarehouseEvent::RecordRemoved { occurred_at, .. } => *occurred_at,
        }
    }
}

/// What a single dispatch did.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DispatchReceipt {
    pub record_id: RecordId,
    pub slot_id: SlotId,
    pub quantity: u64,
    /// Balance left on the record (0 means the record was removed).
    pub remaining: u64,
    /// Whether the slot became free as a result.
    pub slot_released: bool,
}

impl Aggregate for Warehouse {
    type Command = WarehouseCommand;
    type Event = WarehouseEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            WarehouseEvent::SlotAdded { slot, .. } => {
                self.slots.insert(slot.clone());
            }
            WarehouseEvent::SlotRangeAdded { slots, .. } => {
                for slot in slots {
                    self.slots.insert(slot.clone());
                }
            }
            WarehouseEvent::SlotDeleted { slot_id, .. } => {
                self.slots.remove(slot_id);
            }
            WarehouseEvent::CatalogEntryRegistered { entry, .. } => {
                self.catalog.push(entry.clone());
            }
            WarehouseEvent::StockReceived { record, .. } => {
                let slot_id = record.slot_id().clone();
                self.ledger.insert(record.clone());
                self.mark_occupied(&slot_id, record.id());
            }
            WarehouseEvent::StockMerged {
                record_id, quantity, ..
            } => {
                if let Some(record) = self.ledger.get_mut(*record_id) {
                    record.add(*quantity);
                }
            }
            WarehouseEvent::StockDispatched {
                record_id, quantity, ..
            } => {
                let remaining = self.ledger.get_mut(*record_id).map(|r| r.take(*quantity));
                if remaining == Some(0) {
                    self.release_record(*record_id);
                }
            }
            WarehouseEvent::RecordRemoved { record_id, .. } => {
                self.release_record(*record_id);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            WarehouseCommand::AddSlot(cmd) => self.handle_add_slot(cmd),
            WarehouseCommand::AddSlotRange(cmd) => self.handle_add_slot_range(cmd),
            WarehouseCommand::DeleteSlot(cmd) => self.handle_delete_slot(cmd),
            WarehouseCommand::RegisterCatalogEntry(cmd) => self.handle_register(cmd),
            WarehouseCommand::ReceiveGoods(cmd) => self.handle_receive(cmd),
            WarehouseCommand::DispatchGoods(cmd) => self.handle_dispatch(cmd),
            WarehouseCommand::RemoveRecord(cmd) => self.handle_remove(cmd),
        }
    }
}

impl Warehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Decide and apply one command.
    pub fn execute(&mut self, command: &WarehouseCommand) -> DomainResult<Vec<WarehouseEvent>> {
        let events = palletrack_events::execute(self, command)?;
        for event in &events {
            tracing::debug!(
                domain = event.domain(),
                event_type = event.event_type(),
                touches_stock = event.touches_stock(),
                version = self.version,
                "event applied"
            );
        }
        Ok(events)
    }

    pub fn add_slot(&mut self, address: SlotAddress) -> DomainResult<SlotId> {
        let slot_id = address.slot_id();
        self.execute(&WarehouseCommand::AddSlot(AddSlot {
            address,
            occurred_at: Utc::now(),
        }))?;
        tracing::info!(slot_id = %slot_id, "slot added");
        Ok(slot_id)
    }

    /// Create every missing slot in `range`. Existing ids are skipped
    /// silently; returns the number created.
    pub fn add_slot_range(&mut self, range: SlotRange) -> DomainResult<usize> {
        let events = self.execute(&WarehouseCommand::AddSlotRange(AddSlotRange {
            range,
            occurred_at: Utc::now(),
        }))?;
        let created = events
            .iter()
            .map(|ev| match ev {
                WarehouseEvent::SlotRangeAdded { slots, .. } => slots.len(),
                _ => 0,
            })
            .sum();
        tracing::info!(created, "slot range added");
        Ok(created)
    }

    pub fn delete_slot(&mut self, slot_id: &SlotId) -> DomainResult<()> {
        self.execute(&WarehouseCommand::DeleteSlot(DeleteSlot {
            slot_id: slot_id.clone(),
            occurred_at: Utc::now(),
        }))?;
        tracing::info!(slot_id = %slot_id, "slot deleted");
        Ok(())
    }

    pub fn register_catalog_entry(&mut self, entry: CatalogEntry) -> DomainResult<()> {
        let sku = entry.sku().to_string();
        self.execute(&WarehouseCommand::RegisterCatalogEntry(RegisterCatalogEntry {
            entry,
            occurred_at: Utc::now(),
        }))?;
        tracing::info!(sku = %sku, "catalog entry registered");
        Ok(())
    }

    /// Receive goods into a slot, merging into an existing (SKU, slot, lot)
    /// record when there is one. Returns the resulting record.
    pub fn receive(&mut self, line: ReceiptLine) -> DomainResult<StockRecord> {
        self.receive_at(RecordId::new(), line, Utc::now())
    }

    /// [`Warehouse::receive`] with an explicit record id and receipt time.
    pub fn receive_at(
        &mut self,
        record_id: RecordId,
        line: ReceiptLine,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<StockRecord> {
        let events = self.execute(&WarehouseCommand::ReceiveGoods(ReceiveGoods {
            record_id,
            line,
            occurred_at,
        }))?;

        let record_id = match events.first() {
            Some(WarehouseEvent::StockMerged { record_id, .. }) => *record_id,
            _ => record_id,
        };
        let record = self
            .ledger
            .get(record_id)
            .cloned()
            .ok_or_else(|| DomainError::record_not_found(format!("record {record_id}")))?;

        tracing::info!(
            sku = record.sku(),
            lot = record.lot_number(),
            slot_id = %record.slot_id(),
            quantity = record.quantity(),
            "goods received"
        );
        Ok(record)
    }

    /// Dispatch `quantity` units of `sku` from `slot_id`.
    pub fn dispatch(&mut self, sku: &str, slot_id: &SlotId, quantity: u64) -> DomainResult<DispatchReceipt> {
        let sku = canonical_code(sku);
        let record_id = self
            .ledger
            .find_at(sku, slot_id)
            .map(StockRecord::id);

        self.execute(&WarehouseCommand::DispatchGoods(DispatchGoods {
            sku: sku.to_string(),
            slot_id: slot_id.clone(),
            quantity,
            occurred_at: Utc::now(),
        }))?;

        // `handle` only succeeds when the record exists.
        let record_id = record_id
            .ok_or_else(|| DomainError::record_not_found(format!("SKU {sku} at slot {slot_id}")))?;
        let remaining = self.ledger.get(record_id).map_or(0, StockRecord::quantity);
        let slot_released = !self.ledger.holds_stock(slot_id);

        tracing::info!(
            sku,
            slot_id = %slot_id,
            quantity,
            remaining,
            slot_released,
            "goods dispatched"
        );
        Ok(DispatchReceipt {
            record_id,
            slot_id: slot_id.clone(),
            quantity,
            remaining,
            slot_released,
        })
    }

    /// Remove a record outright, whatever its balance.
    pub fn remove_record(&mut self, record_id: RecordId) -> DomainResult<StockRecord> {
        let record = self
            .ledger
            .get(record_id)
            .cloned()
            .ok_or_else(|| DomainError::record_not_found(format!("record {record_id}")))?;
        self.execute(&WarehouseCommand::RemoveRecord(RemoveRecord {
            record_id,
            occurred_at: Utc::now(),
        }))?;
        tracing::info!(
            sku = record.sku(),
            lot = record.lot_number(),
            slot_id = %record.slot_id(),
            "stock record removed"
        );
        Ok(record)
    }

    /// Slots whose occupancy flag disagrees with the ledger. Empty while the
    /// occupancy invariant holds.
    pub fn occupancy_drift(&self) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|slot| slot.is_occupied() != self.ledger.holds_stock(slot.id()))
            .map(|slot| slot.id().clone())
            .collect()
    }

    fn mark_occupied(&mut self, slot_id: &SlotId, record_id: RecordId) {
        if let Err(err) = self.slots.set_occupancy(slot_id, Some(record_id)) {
            tracing::error!(%err, "occupancy update skipped");
        }
    }

    /// Drop a record and recompute its slot's occupancy from the ledger.
    fn release_record(&mut self, record_id: RecordId) {
        let Some(record) = self.ledger.remove(record_id) else {
            return;
        };
        let slot_id = record.slot_id();
        let still_there = self.ledger.records_at(slot_id).next().map(StockRecord::id);
        let pointed_here = self
            .slots
            .get(slot_id)
            .is_some_and(|s| s.occupant() == Some(record_id));

        match still_there {
            None => {
                if let Err(err) = self.slots.set_occupancy(slot_id, None) {
                    tracing::error!(%err, "occupancy update skipped");
                }
            }
            // Keep the back-reference pointing at a live record.
            Some(other) if pointed_here => self.mark_occupied(slot_id, other),
            Some(_) => {}
        }
    }

    fn handle_add_slot(&self, cmd: &AddSlot) -> DomainResult<Vec<WarehouseEvent>> {
        let slot = self.slots.check_new_slot(&cmd.address)?;
        Ok(vec![WarehouseEvent::SlotAdded {
            slot,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_add_slot_range(&self, cmd: &AddSlotRange) -> DomainResult<Vec<WarehouseEvent>> {
        Ok(vec![WarehouseEvent::SlotRangeAdded {
            slots: self.slots.new_slots_in(&cmd.range),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_delete_slot(&self, cmd: &DeleteSlot) -> DomainResult<Vec<WarehouseEvent>> {
        self.slots.check_delete(&cmd.slot_id)?;
        if self.ledger.holds_stock(&cmd.slot_id) {
            return Err(DomainError::SlotOccupied(cmd.slot_id.clone()));
        }
        Ok(vec![WarehouseEvent::SlotDeleted {
            slot_id: cmd.slot_id.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_register(&self, cmd: &RegisterCatalogEntry) -> DomainResult<Vec<WarehouseEvent>> {
        self.catalog.check_register(&cmd.entry)?;
        Ok(vec![WarehouseEvent::CatalogEntryRegistered {
            entry: cmd.entry.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_receive(&self, cmd: &ReceiveGoods) -> DomainResult<Vec<WarehouseEvent>> {
        let line = &cmd.line;
        let sku = canonical_code(&line.sku);
        let lot = canonical_code(&line.lot_number);

        if sku.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if lot.is_empty() {
            return Err(DomainError::validation("lot number cannot be empty"));
        }
        if line.quantity == 0 {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }

        let slot = self
            .slots
            .get(&line.slot_id)
            .ok_or_else(|| DomainError::UnknownSlot(line.slot_id.clone()))?;

        // The flag is only a cache; the ledger decides what the slot holds.
        if slot.is_occupied() || self.ledger.holds_stock(slot.id()) {
            let mut held = self.ledger.records_at(slot.id()).peekable();
            if held.peek().is_none() {
                return Err(DomainError::slot_conflict(
                    slot.id(),
                    sku,
                    lot,
                    "slot is marked occupied but holds no stock record",
                ));
            }
            if let Some(other) = held.find(|r| !r.is_lot(sku, lot)) {
                return Err(DomainError::slot_conflict(
                    slot.id(),
                    sku,
                    lot,
                    format!("held by SKU {} lot {}", other.sku(), other.lot_number()),
                ));
            }
        }

        if let Some(existing) = self.ledger.find_exact(sku, slot.id(), lot) {
            if existing.quantity().checked_add(line.quantity).is_none() {
                return Err(DomainError::validation(format!(
                    "receiving {} unit(s) would overflow the balance of SKU {sku} lot {lot} at slot {}",
                    line.quantity,
                    slot.id()
                )));
            }
            tracing::debug!(sku, lot, slot_id = %slot.id(), "receipt merges into existing record");
            return Ok(vec![WarehouseEvent::StockMerged {
                record_id: existing.id(),
                quantity: line.quantity,
                occurred_at: cmd.occurred_at,
            }]);
        }

        if self.ledger.get(cmd.record_id).is_some() {
            return Err(DomainError::validation(format!(
                "record id {} is already in use",
                cmd.record_id
            )));
        }

        let record = StockRecord::from_receipt(cmd.record_id, line, cmd.occurred_at.date_naive());
        Ok(vec![WarehouseEvent::StockReceived {
            record,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_dispatch(&self, cmd: &DispatchGoods) -> DomainResult<Vec<WarehouseEvent>> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }

        let sku = canonical_code(&cmd.sku);
        let record = self.ledger.find_at(sku, &cmd.slot_id).ok_or_else(|| {
            DomainError::record_not_found(format!("SKU {sku} at slot {}", cmd.slot_id))
        })?;

        if cmd.quantity > record.quantity() {
            return Err(DomainError::InsufficientQuantity {
                sku: sku.to_string(),
                slot_id: cmd.slot_id.clone(),
                requested: cmd.quantity,
                available: record.quantity(),
            });
        }

        Ok(vec![WarehouseEvent::StockDispatched {
            record_id: record.id(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_remove(&self, cmd: &RemoveRecord) -> DomainResult<Vec<WarehouseEvent>> {
        if self.ledger.get(cmd.record_id).is_none() {
            return Err(DomainError::record_not_found(format!("record {}", cmd.record_id)));
        }
        Ok(vec![WarehouseEvent::RecordRemoved {
            record_id: cmd.record_id,
            occurred_at: cmd.occurred_at,
        }])
    }
}
