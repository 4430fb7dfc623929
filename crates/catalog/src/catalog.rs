use palletrack_core::{DomainError, DomainResult, canonical_code};

use crate::entry::CatalogEntry;

/// Registered catalog entries in insertion order. SKUs are unique
/// (case-sensitive exact match).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Exact, case-sensitive SKU lookup; surrounding whitespace is ignored.
    pub fn get_by_sku(&self, sku: &str) -> Option<&CatalogEntry> {
        let sku = canonical_code(sku);
        self.entries.iter().find(|e| e.sku() == sku)
    }

    /// Fails with `DuplicateSku` if the SKU is already registered.
    pub fn check_register(&self, entry: &CatalogEntry) -> DomainResult<()> {
        if self.get_by_sku(entry.sku()).is_some() {
            return Err(DomainError::DuplicateSku(entry.sku().to_string()));
        }
        Ok(())
    }

    pub fn register(&mut self, entry: CatalogEntry) -> DomainResult<()> {
        self.check_register(&entry)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Append an entry already validated by [`Catalog::check_register`].
    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Entries whose SKU or name contains `query`, ignoring case, in
    /// insertion order. The iterator is lazy and can be cloned to restart.
    pub fn find_by_sku_or_name(&self, query: &str) -> CatalogMatches<'_> {
        CatalogMatches {
            entries: self.entries.iter(),
            needle: query.trim().to_lowercase(),
        }
    }
}

/// Lazy search over a [`Catalog`].
#[derive(Debug, Clone)]
pub struct CatalogMatches<'a> {
    entries: core::slice::Iter<'a, CatalogEntry>,
    needle: String,
}

impl<'a> Iterator for CatalogMatches<'a> {
    type Item = &'a CatalogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.entries.by_ref().find(|e| e.matches(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Category;
    use palletrack_core::CatalogEntryId;

    fn entry(sku: &str, name: &str, category: Category) -> CatalogEntry {
        CatalogEntry::new(CatalogEntryId::new(), sku, name, category, None).unwrap()
    }

    fn seeded() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register(entry("SOY-900", "Soybean oil 900ml", Category::Oil)).unwrap();
        catalog.register(entry("FLR-25", "Wheat flour 25kg", Category::Sacks)).unwrap();
        catalog.register(entry("MLK-1L", "UHT milk 1L", Category::Milk)).unwrap();
        catalog
    }

    #[test]
    fn duplicate_sku_is_rejected_and_catalog_unchanged() {
        let mut catalog = seeded();
        let err = catalog
            .register(entry("FLR-25", "Another flour", Category::Sacks))
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateSku("FLR-25".to_string()));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn sku_uniqueness_is_case_sensitive() {
        let mut catalog = seeded();
        catalog.register(entry("flr-25", "Lowercase flour", Category::Sacks)).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn padded_sku_is_the_same_sku() {
        let mut catalog = Catalog::new();
        catalog.register(entry(" MLK ", " UHT milk ", Category::Milk)).unwrap();

        let found = catalog.get_by_sku("MLK").unwrap();
        assert_eq!(found.sku(), "MLK");
        assert_eq!(found.name(), "UHT milk");
        assert!(catalog.get_by_sku("  MLK\t").is_some());

        let err = catalog.register(entry("MLK", "Other milk", Category::Milk)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateSku("MLK".to_string()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn search_matches_sku_or_name_ignoring_case() {
        let catalog = seeded();

        let skus: Vec<&str> = catalog.find_by_sku_or_name("OIL").map(|e| e.sku()).collect();
        assert_eq!(skus, vec!["SOY-900"]);

        let skus: Vec<&str> = catalog.find_by_sku_or_name("l").map(|e| e.sku()).collect();
        assert_eq!(skus, vec!["SOY-900", "FLR-25", "MLK-1L"]);

        assert_eq!(catalog.find_by_sku_or_name("nothing").count(), 0);
    }

    #[test]
    fn search_is_restartable() {
        let catalog = seeded();
        let matches = catalog.find_by_sku_or_name("9");
        let first: Vec<_> = matches.clone().collect();
        let second: Vec<_> = matches.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: registering the same SKU twice never grows the catalog twice.
            #[test]
            fn duplicate_registration_keeps_length(
                skus in proptest::collection::vec("[A-Z0-9]{1,4}", 1..30)
            ) {
                let mut catalog = Catalog::new();
                let mut distinct = std::collections::HashSet::new();
                for sku in &skus {
                    let result = catalog.register(entry(sku, "Item", Category::Oil));
                    prop_assert_eq!(result.is_ok(), distinct.insert(sku.clone()));
                }
                prop_assert_eq!(catalog.len(), distinct.len());
            }
        }
    }
}
