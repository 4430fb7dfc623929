//! Inventory ledger, receiving, dispatch and pick planning.
//!
//! `Warehouse` is the single owned store: it holds the slot registry, the
//! catalog and the ledger, and is the only place they are mutated. Every
//! mutation is a command decided by `handle` (pure) and applied through
//! events, so a rejected command never leaves partial writes behind.

pub mod ledger;
pub mod picking;
pub mod record;
pub mod warehouse;

pub use ledger::{Ledger, LotGroup};
pub use picking::{BatchMode, BatchOutcome, LineOutcome, PickLine, PickPlan, plan_dispatch};
pub use record::{ReceiptLine, StockRecord};
pub use warehouse::{
    AddSlot, AddSlotRange, DeleteSlot, DispatchGoods, DispatchReceipt, ReceiveGoods,
    RegisterCatalogEntry, RemoveRecord, Warehouse, WarehouseCommand, WarehouseEvent,
};
