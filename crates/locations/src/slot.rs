use serde::{Deserialize, Serialize};

use palletrack_core::{RecordId, SlotId};

use crate::address::{SlotAddress, SlotSortKey};

/// A storage position.
///
/// `occupant` is a denormalized back-reference to one stock record stored
/// here. It only marks occupancy; what the slot actually holds is answered by
/// scanning the ledger by slot id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    address: SlotAddress,
    occupied: bool,
    occupant: Option<RecordId>,
}

impl Slot {
    /// A new, unoccupied slot at `address`.
    pub fn new(address: SlotAddress) -> Self {
        Self {
            id: address.slot_id(),
            address,
            occupied: false,
            occupant: None,
        }
    }

    pub fn id(&self) -> &SlotId {
        &self.id
    }

    pub fn address(&self) -> &SlotAddress {
        &self.address
    }

    pub fn aisle(&self) -> &str {
        self.address.aisle()
    }

    pub fn level(&self) -> u32 {
        self.address.level()
    }

    pub fn slot_number(&self) -> u32 {
        self.address.slot()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn occupant(&self) -> Option<RecordId> {
        self.occupant
    }

    pub fn sort_key(&self) -> SlotSortKey {
        self.address.sort_key()
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<RecordId>) {
        self.occupied = occupant.is_some();
        self.occupant = occupant;
    }
}
