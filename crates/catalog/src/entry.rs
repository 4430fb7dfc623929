use core::str::FromStr;

use serde::{Deserialize, Serialize};

use palletrack_core::{CatalogEntryId, DomainError, DomainResult, canonical_code};

/// Product category (fixed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Bagged goods (flour, feed, cement). Heavy.
    Sacks,
    Oil,
    Milk,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Sacks, Category::Oil, Category::Milk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sacks => "sacks",
            Category::Oil => "oil",
            Category::Milk => "milk",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown category {s:?} (expected one of: sacks, oil, milk)"
                ))
            })
    }
}

/// A registered product definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    id: CatalogEntryId,
    sku: String,
    name: String,
    category: Category,
    image_url: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        id: CatalogEntryId,
        sku: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        image_url: Option<String>,
    ) -> DomainResult<Self> {
        let sku = canonical_code(&sku.into()).to_string();
        let name = canonical_code(&name.into()).to_string();
        if sku.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            id,
            sku,
            name,
            category,
            image_url: image_url.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn id(&self) -> CatalogEntryId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Case-insensitive substring match on SKU or name. `needle` must already
    /// be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.sku.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}
