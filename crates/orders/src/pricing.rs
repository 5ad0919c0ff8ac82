//! Prices captured when an order is placed.
//!
//! Amounts are in the smallest currency unit. The catalog may reprice an item
//! later; an order keeps what it was quoted.

use serde::{Deserialize, Serialize};

use stitchflow_catalog::CatalogItem;

use crate::details::{Meters, OrderDetails, StitchType};

impl StitchType {
    /// Tailoring charge for one garment.
    pub fn stitching_charge(self) -> u64 {
        match self {
            StitchType::Shirt => 35_000,
            StitchType::Pant => 45_000,
            StitchType::Kurta => 40_000,
        }
    }
}

/// Unit prices snapshotted from the catalog at placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderPricing {
    /// Price of one product, accessory or innerwear item.
    #[serde(default)]
    pub unit_price: u64,
    #[serde(default)]
    pub fabric_price_per_meter: u64,
    #[serde(default)]
    pub stitching_charge: u64,
    #[serde(default)]
    pub rental_price_per_day: u64,
    #[serde(default)]
    pub rental_deposit: u64,
}

impl OrderPricing {
    pub fn quote(item: Option<&CatalogItem>, details: &OrderDetails) -> Self {
        let mut pricing = OrderPricing {
            stitching_charge: details
                .stitch_type
                .map(StitchType::stitching_charge)
                .unwrap_or(0),
            ..OrderPricing::default()
        };

        match item {
            Some(CatalogItem::Product(p)) => pricing.unit_price = p.price.unwrap_or(0),
            Some(CatalogItem::Fabric(f)) => pricing.fabric_price_per_meter = f.price_per_meter,
            Some(CatalogItem::RentalItem(r)) => {
                pricing.rental_price_per_day = r.price_per_day;
                pricing.rental_deposit = r.deposit_amount;
            }
            Some(CatalogItem::Accessory(a)) => pricing.unit_price = a.price,
            Some(CatalogItem::Innerwear(i)) => pricing.unit_price = i.price,
            None => {}
        }

        pricing
    }

    /// Amount due at placement.
    ///
    /// Goods are charged per unit, fabric by length, stitching once per order.
    /// Rentals pay for the booked days (at least one) plus the deposit.
    pub fn total(&self, details: &OrderDetails, quantity: u32) -> u64 {
        let goods = self.unit_price.saturating_mul(u64::from(quantity));
        let fabric = fabric_cost(self.fabric_price_per_meter, details.meters);
        let rent = self
            .rental_price_per_day
            .saturating_mul(u64::from(details.rental_days.max(1)));

        goods
            .saturating_add(fabric)
            .saturating_add(self.stitching_charge)
            .saturating_add(rent)
            .saturating_add(self.rental_deposit)
    }
}

/// Rounded half up to the nearest unit.
fn fabric_cost(price_per_meter: u64, length: Meters) -> u64 {
    price_per_meter
        .saturating_mul(u64::from(length.centimeters()))
        .saturating_add(50)
        / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::OrderItem;
    use stitchflow_catalog::{
        Accessory, AccessoryCategory, AccessoryId, Fabric, FabricId, Product, ProductCategory,
        ProductId, ProductKind, RentalItem, RentalItemId,
    };
    use stitchflow_core::AggregateId;

    fn fabric(price_per_meter: u64) -> CatalogItem {
        CatalogItem::Fabric(Fabric {
            id: FabricId::new(AggregateId::new()),
            name: "Egyptian cotton".to_string(),
            material: "cotton".to_string(),
            color: "white".to_string(),
            price_per_meter,
            active: true,
        })
    }

    fn details_for(item: &CatalogItem) -> OrderDetails {
        OrderDetails {
            item: Some(OrderItem::from(item)),
            ..OrderDetails::default()
        }
    }

    #[test]
    fn stitched_fabric_pays_length_and_stitching() {
        let item = fabric(60_000);
        let details = OrderDetails {
            stitch_type: Some(StitchType::Shirt),
            meters: "2.5".parse().unwrap(),
            ..details_for(&item)
        };

        let pricing = OrderPricing::quote(Some(&item), &details);
        assert_eq!(pricing.fabric_price_per_meter, 60_000);
        assert_eq!(pricing.stitching_charge, 35_000);
        assert_eq!(pricing.total(&details, 1), 150_000 + 35_000);
    }

    #[test]
    fn fabric_cost_rounds_half_up() {
        assert_eq!(fabric_cost(333, Meters::from_centimeters(150)), 500);
        assert_eq!(fabric_cost(101, Meters::from_centimeters(50)), 51);
        assert_eq!(fabric_cost(0, Meters::from_centimeters(250)), 0);
    }

    #[test]
    fn goods_are_charged_per_unit() {
        let belt = CatalogItem::Accessory(Accessory {
            id: AccessoryId::new(AggregateId::new()),
            name: "Leather belt".to_string(),
            category: AccessoryCategory::Belt,
            price: 79_900,
            active: true,
        });
        let details = details_for(&belt);

        let pricing = OrderPricing::quote(Some(&belt), &details);
        assert_eq!(pricing.total(&details, 3), 3 * 79_900);
    }

    #[test]
    fn unpriced_product_with_stitching_pays_the_charge_only() {
        let kurta = CatalogItem::Product(Product {
            id: ProductId::new(AggregateId::new()),
            name: "Festive kurta".to_string(),
            category: ProductCategory::new("traditional"),
            kind: ProductKind::Custom,
            price: None,
            active: true,
        });
        let details = OrderDetails {
            stitch_type: Some(StitchType::Kurta),
            ..details_for(&kurta)
        };

        let pricing = OrderPricing::quote(Some(&kurta), &details);
        assert_eq!(pricing.total(&details, 1), 40_000);
    }

    #[test]
    fn rentals_pay_at_least_one_day_plus_deposit() {
        let sherwani = CatalogItem::RentalItem(RentalItem {
            id: RentalItemId::new(AggregateId::new()),
            name: "Maroon sherwani".to_string(),
            color: "maroon".to_string(),
            price_per_day: 300_000,
            deposit_amount: 1_500_000,
            active: true,
        });
        let no_days = details_for(&sherwani);
        let three_days = OrderDetails {
            rental_days: 3,
            ..details_for(&sherwani)
        };

        let pricing = OrderPricing::quote(Some(&sherwani), &no_days);
        assert_eq!(pricing.rental_deposit, 1_500_000);
        assert_eq!(pricing.total(&no_days, 1), 300_000 + 1_500_000);
        assert_eq!(pricing.total(&three_days, 1), 900_000 + 1_500_000);
    }

    #[test]
    fn nothing_referenced_costs_nothing() {
        let details = OrderDetails::default();
        let pricing = OrderPricing::quote(None, &details);
        assert_eq!(pricing, OrderPricing::default());
        assert_eq!(pricing.total(&details, 1), 0);
    }
}
