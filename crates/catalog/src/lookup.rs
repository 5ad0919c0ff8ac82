use std::sync::Arc;

use crate::item::{CatalogItem, CatalogRef};

/// Read-only access to the catalog.
pub trait CatalogLookup: Send + Sync {
    /// Resolve a reference; `None` when the item does not exist.
    fn resolve(&self, reference: &CatalogRef) -> Option<CatalogItem>;
}

impl<L> CatalogLookup for Arc<L>
where
    L: CatalogLookup + ?Sized,
{
    fn resolve(&self, reference: &CatalogRef) -> Option<CatalogItem> {
        (**self).resolve(reference)
    }
}
