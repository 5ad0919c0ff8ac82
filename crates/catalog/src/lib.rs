//! Catalog entities the order engine refers to.
//!
//! The catalog itself (CRUD, images, pricing pages) is owned elsewhere; this
//! crate only models what orders need to resolve a reference: identity, name,
//! category and whether the item can still be ordered.

pub mod item;
pub mod lookup;

pub use item::{
    Accessory, AccessoryCategory, AccessoryId, CatalogItem, CatalogRef, Fabric, FabricId,
    Innerwear, InnerwearId, Product, ProductCategory, ProductId, ProductKind, RentalItem,
    RentalItemId,
};
pub use lookup::CatalogLookup;
