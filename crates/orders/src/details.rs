use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use stitchflow_catalog::{
    AccessoryId, CatalogItem, FabricId, InnerwearId, ProductCategory, ProductId, RentalItemId,
};
use stitchflow_core::{DomainError, ValueObject};

/// Garment a customer wants stitched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StitchType {
    Shirt,
    Pant,
    Kurta,
}

/// Fabric length, stored in centimeters (two fractional digits of a meter).
///
/// On the wire it is a decimal string such as `"2.50"`; plain JSON numbers are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Meters(u32);

impl ValueObject for Meters {}

impl Meters {
    pub const ZERO: Meters = Meters(0);

    pub fn from_centimeters(cm: u32) -> Self {
        Self(cm)
    }

    pub fn centimeters(self) -> u32 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl core::fmt::Display for Meters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Meters {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DomainError::validation(format!("invalid meters '{s}'"));

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let frac: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|cm| cm.checked_add(frac))
            .map(Meters)
            .ok_or_else(invalid)
    }
}

impl Serialize for Meters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Meters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        text.parse().map_err(D::Error::custom)
    }
}

/// The catalog item an order was placed against, captured at placement.
///
/// Products keep their category so classification never needs a catalog
/// round-trip after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderItem {
    Product { id: ProductId, category: ProductCategory },
    Fabric { id: FabricId },
    RentalItem { id: RentalItemId },
    Accessory { id: AccessoryId },
    Innerwear { id: InnerwearId },
}

impl From<&CatalogItem> for OrderItem {
    fn from(item: &CatalogItem) -> Self {
        match item {
            CatalogItem::Product(p) => OrderItem::Product {
                id: p.id,
                category: p.category.clone(),
            },
            CatalogItem::Fabric(f) => OrderItem::Fabric { id: f.id },
            CatalogItem::RentalItem(r) => OrderItem::RentalItem { id: r.id },
            CatalogItem::Accessory(a) => OrderItem::Accessory { id: a.id },
            CatalogItem::Innerwear(i) => OrderItem::Innerwear { id: i.id },
        }
    }
}

/// Everything about an order that decides its type and workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(default)]
    pub item: Option<OrderItem>,
    #[serde(default)]
    pub stitch_type: Option<StitchType>,
    #[serde(default)]
    pub meters: Meters,
    #[serde(default)]
    pub rental_days: u32,
}

impl OrderDetails {
    /// A rental is either a rental item or a rental period.
    pub fn is_rental(&self) -> bool {
        self.rental_days > 0 || matches!(self.item, Some(OrderItem::RentalItem { .. }))
    }

    pub fn has_stitching(&self) -> bool {
        self.stitch_type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchflow_core::AggregateId;

    #[test]
    fn parses_decimal_meters() {
        assert_eq!("2.5".parse::<Meters>().unwrap().centimeters(), 250);
        assert_eq!("2.50".parse::<Meters>().unwrap().centimeters(), 250);
        assert_eq!("3".parse::<Meters>().unwrap().centimeters(), 300);
        assert_eq!("0.05".parse::<Meters>().unwrap().centimeters(), 5);
        assert_eq!("0".parse::<Meters>().unwrap(), Meters::ZERO);
    }

    #[test]
    fn rejects_malformed_meters() {
        for bad in ["", "-1", "1.234", ".5", "abc", "1.x", "99999999999"] {
            assert!(bad.parse::<Meters>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn meters_serialize_as_two_place_decimal() {
        let m = Meters::from_centimeters(250);
        assert_eq!(serde_json::to_value(m).unwrap(), "2.50");
    }

    #[test]
    fn meters_accept_json_numbers() {
        let m: Meters = serde_json::from_value(serde_json::json!(2.5)).unwrap();
        assert_eq!(m.centimeters(), 250);
        let m: Meters = serde_json::from_value(serde_json::json!("1.75")).unwrap();
        assert_eq!(m.centimeters(), 175);
    }

    #[test]
    fn rental_by_item_or_by_days() {
        let by_item = OrderDetails {
            item: Some(OrderItem::RentalItem {
                id: RentalItemId::new(AggregateId::new()),
            }),
            ..OrderDetails::default()
        };
        let by_days = OrderDetails {
            rental_days: 3,
            ..OrderDetails::default()
        };

        assert!(by_item.is_rental());
        assert!(by_days.is_rental());
        assert!(!OrderDetails::default().is_rental());
    }

    #[test]
    fn details_default_missing_fields() {
        let details: OrderDetails = serde_json::from_value(serde_json::json!({
            "stitch_type": "kurta",
        }))
        .unwrap();

        assert_eq!(details.stitch_type, Some(StitchType::Kurta));
        assert_eq!(details.meters, Meters::ZERO);
        assert_eq!(details.rental_days, 0);
        assert!(details.item.is_none());
    }
}
