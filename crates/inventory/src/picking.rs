//! Dispatch planning: Smallest-Balance-First with FIFO tie-break.
//!
//! Planning is read-only. A plan is turned into stock movements by
//! [`Warehouse::execute_pick_plan`], one dispatch per line.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use palletrack_core::{
    DomainError, DomainResult, RecordId, SlotId, canonical_code, saturating_total,
};

use crate::ledger::Ledger;
use crate::record::StockRecord;
use crate::warehouse::{DispatchReceipt, Warehouse};

/// Units to take from one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickLine {
    pub slot_id: SlotId,
    pub record_id: RecordId,
    pub quantity: u64,
    /// Balance of the record when the plan was made.
    pub available: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickPlan {
    pub sku: String,
    pub lot_number: String,
    pub requested: u64,
    /// Lines in allocation order (smallest balance first).
    pub lines: Vec<PickLine>,
    /// Units that could not be allocated. Zero when the lot covers the request.
    pub shortfall: u64,
}

impl PickPlan {
    pub fn planned_quantity(&self) -> u64 {
        saturating_total(self.lines.iter().map(|l| l.quantity))
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }

    /// Planned quantity for `slot_id`, or zero.
    pub fn quantity_for(&self, slot_id: &SlotId) -> u64 {
        saturating_total(
            self.lines
                .iter()
                .filter(|l| &l.slot_id == slot_id)
                .map(|l| l.quantity),
        )
    }
}

/// Plan how to take `target` units of (`sku`, `lot_number`) out of the ledger.
///
/// Records are drained smallest balance first; equal balances go oldest entry
/// date first, then in ledger order. A target larger than the lot's total is
/// not an error: everything is allocated and the rest is reported as
/// `shortfall`.
pub fn plan_dispatch(ledger: &Ledger, sku: &str, lot_number: &str, target: u64) -> DomainResult<PickPlan> {
    if target == 0 {
        return Err(DomainError::validation("dispatch target must be greater than zero"));
    }
    let sku = canonical_code(sku);
    let lot_number = canonical_code(lot_number);

    let mut candidates: Vec<&StockRecord> = ledger.lot_records(sku, lot_number).collect();
    // Stable sort keeps ledger order for full ties.
    candidates.sort_by_key(|r| (r.quantity(), r.entry_date()));

    let mut remaining = target;
    let mut lines = Vec::new();
    for record in candidates {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(record.quantity());
        lines.push(PickLine {
            slot_id: record.slot_id().clone(),
            record_id: record.id(),
            quantity: take,
            available: record.quantity(),
        });
        remaining -= take;
    }

    if remaining > 0 {
        tracing::warn!(
            sku,
            lot = lot_number,
            requested = target,
            shortfall = remaining,
            "not enough stock to cover dispatch request"
        );
    }

    Ok(PickPlan {
        sku: sku.to_string(),
        lot_number: lot_number.to_string(),
        requested: target,
        lines,
        shortfall: remaining,
    })
}

/// How a batch dispatch treats a failing line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchMode {
    /// Apply every line that succeeds; report the rest.
    #[default]
    #[serde(rename = "continue")]
    ContinueOnError,
    /// Apply nothing unless every line succeeds.
    #[serde(rename = "atomic")]
    AllOrNothing,
}

impl BatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::ContinueOnError => "continue",
            BatchMode::AllOrNothing => "atomic",
        }
    }
}

impl core::fmt::Display for BatchMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(BatchMode::ContinueOnError),
            "atomic" => Ok(BatchMode::AllOrNothing),
            other => Err(DomainError::validation(format!(
                "unknown batch mode {other:?} (expected continue or atomic)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    pub line: PickLine,
    pub result: Result<DispatchReceipt, DomainError>,
}

/// Result of executing a [`PickPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub mode: BatchMode,
    /// Whether the successful lines' effects were kept. Always true for
    /// `ContinueOnError`; for `AllOrNothing` only when no line failed.
    pub committed: bool,
    pub lines: Vec<LineOutcome>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.lines.iter().filter(|l| l.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.lines.len() - self.succeeded()
    }

    /// Units actually removed from the ledger.
    pub fn dispatched_quantity(&self) -> u64 {
        if !self.committed {
            return 0;
        }
        saturating_total(
            self.lines
                .iter()
                .filter_map(|l| l.result.as_ref().ok())
                .map(|r| r.quantity),
        )
    }
}

impl Warehouse {
    /// See [`plan_dispatch`].
    pub fn plan_dispatch(&self, sku: &str, lot_number: &str, target: u64) -> DomainResult<PickPlan> {
        plan_dispatch(self.ledger(), sku, lot_number, target)
    }

    /// Dispatch every line of `plan`, one slot at a time.
    pub fn execute_pick_plan(&mut self, plan: &PickPlan, mode: BatchMode) -> BatchOutcome {
        let outcome = match mode {
            BatchMode::ContinueOnError => BatchOutcome {
                mode,
                committed: true,
                lines: self.dispatch_lines(plan),
            },
            BatchMode::AllOrNothing => {
                let mut staged = self.clone();
                let lines = staged.dispatch_lines(plan);
                let committed = lines.iter().all(|l| l.result.is_ok());
                if committed {
                    *self = staged;
                }
                BatchOutcome {
                    mode,
                    committed,
                    lines,
                }
            }
        };

        if outcome.failed() > 0 {
            tracing::warn!(
                sku = %plan.sku,
                lot = %plan.lot_number,
                mode = %mode,
                succeeded = outcome.succeeded(),
                failed = outcome.failed(),
                committed = outcome.committed,
                "pick plan finished with failures"
            );
        } else {
            tracing::info!(
                sku = %plan.sku,
                lot = %plan.lot_number,
                lines = outcome.lines.len(),
                quantity = outcome.dispatched_quantity(),
                "pick plan executed"
            );
        }
        outcome
    }

    fn dispatch_lines(&mut self, plan: &PickPlan) -> Vec<LineOutcome> {
        plan.lines
            .iter()
            .map(|line| LineOutcome {
                line: line.clone(),
                result: self.dispatch_line(plan, line),
            })
            .collect()
    }

    /// Dispatch one line, provided the planned record still holds the plan's
    /// lot at the planned slot.
    fn dispatch_line(&mut self, plan: &PickPlan, line: &PickLine) -> DomainResult<DispatchReceipt> {
        let still_planned = self.ledger().get(line.record_id).is_some_and(|r| {
            r.is_lot(&plan.sku, &plan.lot_number) && r.slot_id() == &line.slot_id
        });
        if !still_planned {
            return Err(DomainError::record_not_found(format!(
                "record {} of SKU {} lot {} at slot {}",
                line.record_id, plan.sku, plan.lot_number, line.slot_id
            )));
        }
        self.dispatch(&plan.sku, &line.slot_id, line.quantity)
    }
}
