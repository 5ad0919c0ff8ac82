//! In-memory catalog backing [`CatalogLookup`].

use std::collections::HashMap;
use std::sync::RwLock;

use stitchflow_catalog::{CatalogItem, CatalogLookup, CatalogRef};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: RwLock<HashMap<CatalogRef, CatalogItem>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let catalog = Self::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Add or replace an item.
    pub fn insert(&self, item: CatalogItem) {
        if let Ok(mut items) = self.items.write() {
            items.insert(item.reference(), item);
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn resolve(&self, reference: &CatalogRef) -> Option<CatalogItem> {
        self.items.read().ok()?.get(reference).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchflow_catalog::{Innerwear, InnerwearId};
    use stitchflow_core::AggregateId;

    #[test]
    fn resolves_inserted_items_only() {
        let id = InnerwearId::new(AggregateId::new());
        let catalog = InMemoryCatalog::with_items([CatalogItem::Innerwear(Innerwear {
            id,
            name: "Cotton vest".to_string(),
            price: 29_900,
            active: true,
        })]);

        let found = catalog.resolve(&CatalogRef::Innerwear(id)).unwrap();
        assert_eq!(found.name(), "Cotton vest");
        assert!(catalog
            .resolve(&CatalogRef::Innerwear(InnerwearId::new(AggregateId::new())))
            .is_none());
        assert_eq!(catalog.len(), 1);
    }
}
