use std::collections::HashSet;

use palletrack_core::{DomainError, DomainResult, RecordId, SlotId};

use crate::address::{NaturalKey, SlotAddress, SlotRange};
use crate::slot::Slot;

/// The set of registered storage positions, kept sorted by [`SlotSortKey`].
///
/// The `check_*` methods are pure and are what the warehouse store calls while
/// deciding a command; `add_*`/`delete_slot` combine check and mutation for
/// direct use.
///
/// [`SlotSortKey`]: crate::address::SlotSortKey
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn get(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: &SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Unoccupied slots in sorted order.
    pub fn free_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.is_occupied())
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    /// Distinct aisle labels in natural order.
    pub fn aisles(&self) -> Vec<&str> {
        let mut aisles: Vec<&str> = self.slots.iter().map(|s| s.aisle()).collect();
        aisles.sort_by_cached_key(|a| NaturalKey::new(a));
        aisles.dedup();
        aisles
    }

    /// Validate a single slot creation and build the slot it would insert.
    pub fn check_new_slot(&self, address: &SlotAddress) -> DomainResult<Slot> {
        let slot = Slot::new(address.clone());
        if self.contains(slot.id()) {
            return Err(DomainError::DuplicateSlot(slot.id().clone()));
        }
        Ok(slot)
    }

    pub fn add_slot(&mut self, address: &SlotAddress) -> DomainResult<SlotId> {
        let slot = self.check_new_slot(address)?;
        let id = slot.id().clone();
        self.insert(slot);
        Ok(id)
    }

    /// Slots of `range` that do not exist yet, in creation order.
    ///
    /// Distinct (slot, level) pairs of one range always yield distinct ids, so
    /// only the existing registry needs checking.
    pub fn new_slots_in(&self, range: &SlotRange) -> Vec<Slot> {
        let existing: HashSet<&SlotId> = self.slots.iter().map(Slot::id).collect();
        range
            .addresses()
            .map(Slot::new)
            .filter(|slot| !existing.contains(slot.id()))
            .collect()
    }

    /// Create every missing slot of `range`; existing ids are skipped silently.
    /// Returns the number of slots created.
    pub fn add_slot_range(&mut self, range: &SlotRange) -> usize {
        let fresh = self.new_slots_in(range);
        let created = fresh.len();
        for slot in fresh {
            self.insert(slot);
        }
        tracing::debug!(
            prefix = range.prefix(),
            aisle = range.aisle(),
            candidates = range.len(),
            created,
            "slot range generated"
        );
        created
    }

    pub fn check_delete(&self, id: &SlotId) -> DomainResult<()> {
        match self.get(id) {
            None => Err(DomainError::UnknownSlot(id.clone())),
            Some(slot) if slot.is_occupied() => Err(DomainError::SlotOccupied(id.clone())),
            Some(_) => Ok(()),
        }
    }

    pub fn delete_slot(&mut self, id: &SlotId) -> DomainResult<Slot> {
        self.check_delete(id)?;
        self.remove(id)
            .ok_or_else(|| DomainError::UnknownSlot(id.clone()))
    }

    /// Set or clear the occupancy flag and back-reference.
    ///
    /// Only receiving and dispatch should call this; they decide occupancy
    /// from the ledger.
    pub fn set_occupancy(&mut self, id: &SlotId, occupant: Option<RecordId>) -> DomainResult<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| DomainError::UnknownSlot(id.clone()))?;
        slot.set_occupant(occupant);
        Ok(())
    }

    /// Insert a slot at its sorted position. Returns `false` (and changes
    /// nothing) if the id is already present.
    pub fn insert(&mut self, slot: Slot) -> bool {
        if self.contains(slot.id()) {
            return false;
        }
        let key = slot.sort_key();
        let at = self.slots.partition_point(|s| s.sort_key() <= key);
        self.slots.insert(at, slot);
        true
    }

    pub fn remove(&mut self, id: &SlotId) -> Option<Slot> {
        let at = self.slots.iter().position(|s| s.id() == id)?;
        Some(self.slots.remove(at))
    }
}
