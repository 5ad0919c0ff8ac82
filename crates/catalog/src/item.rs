use serde::{Deserialize, Serialize};

use stitchflow_core::{AggregateId, Entity};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(pub AggregateId);

        impl $t {
            pub fn new(id: AggregateId) -> Self {
                Self(id)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

catalog_id!(
    /// Finished garment (shirt, pant, traditional set).
    ProductId
);
catalog_id!(FabricId);
catalog_id!(RentalItemId);
catalog_id!(AccessoryId);
catalog_id!(InnerwearId);

/// Product category as entered by the shop (e.g. "shirt", "traditional").
///
/// Kept as free text: the shop adds categories without a deploy, and orders
/// only care whether a category is the traditional one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCategory(String);

impl ProductCategory {
    pub const TRADITIONAL: &'static str = "traditional";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_traditional(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(Self::TRADITIONAL)
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a product is tailored to measure or sold off the rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Custom,
    Readymade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessoryCategory {
    Belt,
    Tie,
    Wallet,
    Socks,
    Cufflink,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub kind: ProductKind,
    /// Price in smallest currency unit (paise); bundles may be priced on request.
    pub price: Option<u64>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fabric {
    pub id: FabricId,
    pub name: String,
    /// Material, e.g. cotton, linen, silk.
    pub material: String,
    pub color: String,
    pub price_per_meter: u64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalItem {
    pub id: RentalItemId,
    pub name: String,
    pub color: String,
    pub price_per_day: u64,
    pub deposit_amount: u64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: AccessoryId,
    pub name: String,
    pub category: AccessoryCategory,
    pub price: u64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innerwear {
    pub id: InnerwearId,
    pub name: String,
    pub price: u64,
    pub active: bool,
}

macro_rules! impl_entity {
    ($($t:ty => $id:ty),* $(,)?) => {
        $(
            impl Entity for $t {
                type Id = $id;

                fn id(&self) -> &Self::Id {
                    &self.id
                }
            }
        )*
    };
}

impl_entity!(
    Product => ProductId,
    Fabric => FabricId,
    RentalItem => RentalItemId,
    Accessory => AccessoryId,
    Innerwear => InnerwearId,
);

/// Reference to exactly one catalog item, as supplied when placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CatalogRef {
    Product(ProductId),
    Fabric(FabricId),
    RentalItem(RentalItemId),
    Accessory(AccessoryId),
    Innerwear(InnerwearId),
}

/// A resolved catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    Product(Product),
    Fabric(Fabric),
    RentalItem(RentalItem),
    Accessory(Accessory),
    Innerwear(Innerwear),
}

impl CatalogItem {
    pub fn reference(&self) -> CatalogRef {
        match self {
            CatalogItem::Product(p) => CatalogRef::Product(p.id),
            CatalogItem::Fabric(f) => CatalogRef::Fabric(f.id),
            CatalogItem::RentalItem(r) => CatalogRef::RentalItem(r.id),
            CatalogItem::Accessory(a) => CatalogRef::Accessory(a.id),
            CatalogItem::Innerwear(i) => CatalogRef::Innerwear(i.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Product(p) => &p.name,
            CatalogItem::Fabric(f) => &f.name,
            CatalogItem::RentalItem(r) => &r.name,
            CatalogItem::Accessory(a) => &a.name,
            CatalogItem::Innerwear(i) => &i.name,
        }
    }

    /// Inactive items stay resolvable for old orders but cannot be ordered.
    pub fn is_active(&self) -> bool {
        match self {
            CatalogItem::Product(p) => p.active,
            CatalogItem::Fabric(f) => f.active,
            CatalogItem::RentalItem(r) => r.active,
            CatalogItem::Accessory(a) => a.active,
            CatalogItem::Innerwear(i) => i.active,
        }
    }
}
