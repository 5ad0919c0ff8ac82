use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order status.
///
/// Declaration order follows the longest path through the workflows, so the
/// derived `Ord` sorts statuses the way the shop floor reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Processing,
    Stitching,
    Buttoning,
    Ironing,
    ReadyForPickup,
    PickedUp,
    Returned,
    DepositRefunded,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 10] = [
        OrderStatus::Placed,
        OrderStatus::Processing,
        OrderStatus::Stitching,
        OrderStatus::Buttoning,
        OrderStatus::Ironing,
        OrderStatus::ReadyForPickup,
        OrderStatus::PickedUp,
        OrderStatus::Returned,
        OrderStatus::DepositRefunded,
        OrderStatus::Cancelled,
    ];

    /// Status every new order starts in.
    pub const INITIAL: OrderStatus = OrderStatus::Placed;

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Processing => "processing",
            OrderStatus::Stitching => "stitching",
            OrderStatus::Buttoning => "buttoning",
            OrderStatus::Ironing => "ironing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Returned => "returned",
            OrderStatus::DepositRefunded => "deposit_refunded",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human label used in notifications and the admin dashboard.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Placed => "Order Placed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Stitching => "Stitching",
            OrderStatus::Buttoning => "Buttoning",
            OrderStatus::Ironing => "Ironing",
            OrderStatus::ReadyForPickup => "Ready for Pickup",
            OrderStatus::PickedUp => "Picked Up",
            OrderStatus::Returned => "Returned",
            OrderStatus::DepositRefunded => "Deposit Refunded",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Statuses that only make sense once a rented garment comes back.
    pub fn is_rental_only(self) -> bool {
        matches!(self, OrderStatus::Returned | OrderStatus::DepositRefunded)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    /// Accepts the wire names, ignoring surrounding whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
