//! Per-run seller cache.

use std::collections::HashMap;

use pscraper_core::SellerInfo;

/// Result of resolving an owner id, as remembered by [`SellerCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedSeller {
    Resolved(SellerInfo),
    /// The owner's page had no usable address. Every listing referencing the
    /// owner is rejected without another lookup.
    Unresolvable,
}

/// Owner id → seller resolution, owned by a single scrape run.
#[derive(Debug, Default)]
pub struct SellerCache {
    entries: HashMap<String, CachedSeller>,
}

impl SellerCache {
    #[must_use]
    pub fn get(&self, owner_id: &str) -> Option<&CachedSeller> {
        self.entries.get(owner_id)
    }

    pub fn put(&mut self, owner_id: impl Into<String>, seller: CachedSeller) {
        self.entries.insert(owner_id.into(), seller);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
