//! Slot addresses, id formatting and locale-independent ordering.

use core::cmp::Ordering;
use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use palletrack_core::{DomainError, DomainResult, SlotId};

/// Structured address of a storage slot: `{prefix}{aisle}.{slot:02}.{level:03}`.
///
/// The prefix is stored upper-cased. `slot` is the position within the row,
/// `level` the shelf height (1 = floor).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAddress {
    prefix: String,
    aisle: String,
    slot: u32,
    level: u32,
}

impl SlotAddress {
    pub fn new(
        prefix: impl AsRef<str>,
        aisle: impl AsRef<str>,
        slot: u32,
        level: u32,
    ) -> DomainResult<Self> {
        let (prefix, aisle) = normalize_labels(prefix.as_ref(), aisle.as_ref())?;
        Ok(Self {
            prefix,
            aisle,
            slot,
            level,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn aisle(&self) -> &str {
        &self.aisle
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// The printable slot id, e.g. prefix `R`, aisle `1`, slot 7, level 12
    /// gives `R1.07.012`. Labelling integrations depend on this exact form.
    pub fn slot_id(&self) -> SlotId {
        SlotId::new(format!(
            "{}{}.{:02}.{:03}",
            self.prefix, self.aisle, self.slot, self.level
        ))
    }

    pub fn sort_key(&self) -> SlotSortKey {
        SlotSortKey {
            prefix: NaturalKey::new(&self.prefix),
            aisle: NaturalKey::new(&self.aisle),
            slot: self.slot,
            level: self.level,
        }
    }
}

/// A rectangular block of slots in one aisle (bulk creation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRange {
    prefix: String,
    aisle: String,
    slots: RangeInclusive<u32>,
    levels: RangeInclusive<u32>,
}

impl SlotRange {
    pub fn new(
        prefix: impl AsRef<str>,
        aisle: impl AsRef<str>,
        slots: RangeInclusive<u32>,
        levels: RangeInclusive<u32>,
    ) -> DomainResult<Self> {
        let (prefix, aisle) = normalize_labels(prefix.as_ref(), aisle.as_ref())?;
        let range = Self {
            prefix,
            aisle,
            slots,
            levels,
        };
        if range.len() > SlotRange::MAX_SLOTS {
            return Err(DomainError::validation(format!(
                "slot range covers {} positions; at most {} can be generated at once",
                range.len(),
                SlotRange::MAX_SLOTS
            )));
        }
        Ok(range)
    }

    /// Largest number of candidate addresses one range may expand to.
    pub const MAX_SLOTS: usize = 10_000;

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn aisle(&self) -> &str {
        &self.aisle
    }

    /// Number of candidate addresses (before skipping existing ones).
    pub fn len(&self) -> usize {
        range_len(&self.slots).saturating_mul(range_len(&self.levels))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate addresses, slot-major: every level of slot 1, then slot 2, ...
    pub fn addresses(&self) -> impl Iterator<Item = SlotAddress> + '_ {
        self.slots.clone().flat_map(move |slot| {
            self.levels.clone().map(move |level| SlotAddress {
                prefix: self.prefix.clone(),
                aisle: self.aisle.clone(),
                slot,
                level,
            })
        })
    }
}

fn range_len(range: &RangeInclusive<u32>) -> usize {
    if range.is_empty() {
        0
    } else {
        (range.end() - range.start()) as usize + 1
    }
}

fn normalize_labels(prefix: &str, aisle: &str) -> DomainResult<(String, String)> {
    let prefix = prefix.trim().to_uppercase();
    let aisle = aisle.trim().to_string();
    if prefix.is_empty() {
        return Err(DomainError::validation("slot prefix cannot be empty"));
    }
    if aisle.is_empty() {
        return Err(DomainError::validation("aisle label cannot be empty"));
    }
    if prefix.contains('.') || aisle.contains('.') {
        return Err(DomainError::validation(
            "slot prefix and aisle label cannot contain '.'",
        ));
    }
    Ok((prefix, aisle))
}

/// Composite ordering key for slots: prefix, aisle, slot number, level.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotSortKey {
    prefix: NaturalKey,
    aisle: NaturalKey,
    slot: u32,
    level: u32,
}

/// Numeric-aware ordering key for a free-text label (`A2` < `A10`).
///
/// Digit runs compare by value, text runs case-insensitively; a digit run
/// sorts before a text run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

impl NaturalKey {
    pub fn new(label: &str) -> Self {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut in_digits = false;

        for ch in label.chars() {
            let is_digit = ch.is_ascii_digit();
            if !current.is_empty() && is_digit != in_digits {
                chunks.push(Chunk::from_run(core::mem::take(&mut current), in_digits));
            }
            in_digits = is_digit;
            current.push(ch);
        }
        if !current.is_empty() {
            chunks.push(Chunk::from_run(current, in_digits));
        }

        Self(chunks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk {
    Digits(String),
    Text(String),
}

impl Chunk {
    fn from_run(run: String, digits: bool) -> Self {
        if digits { Chunk::Digits(run) } else { Chunk::Text(run) }
    }
}

impl Ord for Chunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Digits(a), Chunk::Digits(b)) => {
                // Compare by value without parsing, so long runs cannot overflow.
                let ta = a.trim_start_matches('0');
                let tb = b.trim_start_matches('0');
                ta.len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| a.len().cmp(&b.len()))
            }
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
            (Chunk::Text(a), Chunk::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
        }
    }
}

impl PartialOrd for Chunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_id_is_zero_padded() {
        let address = SlotAddress::new("R", "1", 7, 12).unwrap();
        assert_eq!(address.slot_id().as_str(), "R1.07.012");

        let wide = SlotAddress::new("r", "12", 123, 1234).unwrap();
        assert_eq!(wide.slot_id().as_str(), "R12.123.1234");
    }

    #[test]
    fn blank_labels_are_rejected() {
        assert!(matches!(
            SlotAddress::new("  ", "1", 1, 1),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            SlotRange::new("R", "", 1..=2, 1..=2),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            SlotAddress::new("R", "1.2", 1, 1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn range_enumerates_slot_major() {
        let range = SlotRange::new("R", "1", 1..=2, 1..=2).unwrap();
        let ids: Vec<String> = range
            .addresses()
            .map(|a| a.slot_id().as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["R1.01.001", "R1.01.002", "R1.02.001", "R1.02.002"]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn reversed_range_is_empty() {
        #[allow(clippy::reversed_empty_ranges)]
        let range = SlotRange::new("R", "1", 5..=1, 1..=4).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.addresses().count(), 0);
    }

    #[test]
    fn oversized_range_is_rejected() {
        let err = SlotRange::new("R", "1", 1..=u32::MAX, 1..=u32::MAX).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert!(SlotRange::new("R", "1", 1..=4_294_967_295, 1..=1).is_err());
        assert!(SlotRange::new("R", "1", 1..=100, 1..=101).is_err());

        let widest = SlotRange::new("R", "1", 1..=100, 1..=100).unwrap();
        assert_eq!(widest.len(), SlotRange::MAX_SLOTS);
    }

    #[test]
    fn natural_key_orders_numbers_by_value() {
        assert!(NaturalKey::new("2") < NaturalKey::new("10"));
        assert!(NaturalKey::new("A2") < NaturalKey::new("A10"));
        assert!(NaturalKey::new("a") < NaturalKey::new("B"));
        assert!(NaturalKey::new("9") < NaturalKey::new("A"));
        assert!(NaturalKey::new("1") < NaturalKey::new("01"));
    }

    #[test]
    fn sort_key_orders_aisle_then_slot_then_level() {
        let a = SlotAddress::new("R", "2", 10, 1).unwrap().sort_key();
        let b = SlotAddress::new("R", "10", 1, 1).unwrap().sort_key();
        let c = SlotAddress::new("R", "2", 2, 4).unwrap().sort_key();
        assert!(c < a);
        assert!(a < b);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: natural order on plain numbers matches numeric order.
            #[test]
            fn natural_key_agrees_with_numeric_order(a in 0u64..1_000_000, b in 0u64..1_000_000) {
                let ka = NaturalKey::new(&a.to_string());
                let kb = NaturalKey::new(&b.to_string());
                prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
            }

            /// Property: slot ids sort like their (slot, level) pair within one aisle.
            #[test]
            fn sort_key_agrees_with_numeric_slot_level(
                s1 in 1u32..200, l1 in 1u32..50,
                s2 in 1u32..200, l2 in 1u32..50,
            ) {
                let a = SlotAddress::new("R", "1", s1, l1).unwrap();
                let b = SlotAddress::new("R", "1", s2, l2).unwrap();
                prop_assert_eq!(a.sort_key().cmp(&b.sort_key()), (s1, l1).cmp(&(s2, l2)));
            }
        }
    }
}
