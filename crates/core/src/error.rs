//! Domain error model.

use thiserror::Error;

use crate::id::SlotId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a local validation failure raised before any state is
/// touched. Messages name the offending slot, SKU, lot or quantity so they can
/// be shown to the operator as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A slot with this id is already registered.
    #[error("slot {0} already exists")]
    DuplicateSlot(SlotId),

    /// A catalog entry with this SKU is already registered.
    #[error("SKU {0} is already registered in the catalog")]
    DuplicateSku(String),

    /// The slot still holds stock and cannot be deleted.
    #[error("slot {0} is occupied and cannot be deleted")]
    SlotOccupied(SlotId),

    /// The slot is not registered.
    #[error("slot {0} does not exist")]
    UnknownSlot(SlotId),

    /// The slot is held by a different (SKU, lot) than the incoming receipt.
    #[error("slot {slot_id} cannot receive SKU {sku} lot {lot}: {detail}")]
    SlotConflict {
        slot_id: SlotId,
        sku: String,
        lot: String,
        detail: String,
    },

    /// No stock record matches the request.
    #[error("stock record not found: {0}")]
    RecordNotFound(String),

    /// The requested quantity exceeds the record's balance.
    #[error(
        "cannot dispatch {requested} unit(s) of SKU {sku} from slot {slot_id}: only {available} available"
    )]
    InsufficientQuantity {
        sku: String,
        slot_id: SlotId,
        requested: u64,
        available: u64,
    },

    /// A value failed validation (e.g. blank SKU, zero quantity).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn record_not_found(what: impl Into<String>) -> Self {
        Self::RecordNotFound(what.into())
    }

    pub fn slot_conflict(
        slot_id: &SlotId,
        sku: impl Into<String>,
        lot: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::SlotConflict {
            slot_id: slot_id.clone(),
            sku: sku.into(),
            lot: lot.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = DomainError::InsufficientQuantity {
            sku: "OIL-900".to_string(),
            slot_id: SlotId::new("R1.02.001"),
            requested: 12,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "cannot dispatch 12 unit(s) of SKU OIL-900 from slot R1.02.001: only 5 available"
        );

        let err = DomainError::slot_conflict(
            &SlotId::new("R1.01.001"),
            "MILK-1L",
            "L-02",
            "held by SKU MILK-1L lot L-01",
        );
        assert_eq!(
            err.to_string(),
            "slot R1.01.001 cannot receive SKU MILK-1L lot L-02: held by SKU MILK-1L lot L-01"
        );
    }
}
