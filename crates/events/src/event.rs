use chrono::{DateTime, Utc};

/// An accepted change to the warehouse: a slot created or deleted, a catalog
/// entry registered, stock received, merged, dispatched or removed.
///
/// Event types are dotted names whose first segment is the owning area
/// (`locations`, `catalog` or `inventory`), e.g. `inventory.stock.received`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// Business time of the change. Receipts take their entry date from it.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Area of the warehouse the event belongs to: the first segment of
    /// [`Event::event_type`].
    fn domain(&self) -> &'static str {
        let event_type = self.event_type();
        event_type.split('.').next().unwrap_or(event_type)
    }

    /// Whether the event changes the stock ledger (and with it slot occupancy).
    fn touches_stock(&self) -> bool {
        self.domain() == "inventory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone)]
    struct Named(&'static str);

    impl Event for Named {
        fn event_type(&self) -> &'static str {
            self.0
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        }
    }

    #[test]
    fn domain_is_the_leading_segment() {
        assert_eq!(Named("inventory.stock.received").domain(), "inventory");
        assert_eq!(Named("locations.slot.added").domain(), "locations");
        assert_eq!(Named("standalone").domain(), "standalone");
    }

    #[test]
    fn only_inventory_events_touch_stock() {
        assert!(Named("inventory.stock.dispatched").touches_stock());
        assert!(!Named("catalog.entry.registered").touches_stock());
        assert!(!Named("locations.slot.deleted").touches_stock());
    }
}
