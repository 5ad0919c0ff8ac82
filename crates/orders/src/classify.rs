//! Product-type classification of orders.

use serde::{Deserialize, Serialize};

use crate::details::{OrderDetails, OrderItem};

/// What kind of order this is; decides which status workflow governs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Rental,
    Custom,
    Fabric,
    Innerwear,
    Accessory,
    Traditional,
    ReadyMade,
    Other,
}

impl OrderType {
    pub const ALL: [OrderType; 8] = [
        OrderType::Rental,
        OrderType::Custom,
        OrderType::Fabric,
        OrderType::Innerwear,
        OrderType::Accessory,
        OrderType::Traditional,
        OrderType::ReadyMade,
        OrderType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Rental => "rental",
            OrderType::Custom => "custom",
            OrderType::Fabric => "fabric",
            OrderType::Innerwear => "innerwear",
            OrderType::Accessory => "accessory",
            OrderType::Traditional => "traditional",
            OrderType::ReadyMade => "ready-made",
            OrderType::Other => "other",
        }
    }
}

impl core::fmt::Display for OrderType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an order. First matching rule wins:
///
/// 1. rental: rental item referenced, or rental days booked
/// 2. custom: stitch type chosen and a fabric length given
/// 3. fabric: fabric referenced with a length
/// 4. innerwear
/// 5. accessory
/// 6. traditional: product in the "traditional" category
/// 7. ready-made: any other product
/// 8. other
pub fn classify(details: &OrderDetails) -> OrderType {
    if details.is_rental() {
        return OrderType::Rental;
    }

    let has_length = details.meters.is_positive();
    if details.has_stitching() && has_length {
        return OrderType::Custom;
    }

    match &details.item {
        Some(OrderItem::Fabric { .. }) if has_length => OrderType::Fabric,
        Some(OrderItem::Innerwear { .. }) => OrderType::Innerwear,
        Some(OrderItem::Accessory { .. }) => OrderType::Accessory,
        Some(OrderItem::Product { category, .. }) if category.is_traditional() => {
            OrderType::Traditional
        }
        Some(OrderItem::Product { .. }) => OrderType::ReadyMade,
        _ => OrderType::Other,
    }
}
