//! Unit arithmetic and code normalization shared by the ledger, planner and
//! reports.

/// Sum of `quantities`, clamped at `u64::MAX`.
///
/// Individual balances may sit anywhere in `u64`, so totals across records
/// must never wrap.
pub fn saturating_total<I>(quantities: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    quantities
        .into_iter()
        .fold(0u64, |total, q| total.saturating_add(q))
}

/// Canonical form of a SKU, product name or lot number: surrounding
/// whitespace removed, case kept.
///
/// Every store and every lookup goes through this, so `" MLK "` and `"MLK"`
/// name the same product.
pub fn canonical_code(raw: &str) -> &str {
    raw.trim()
}
