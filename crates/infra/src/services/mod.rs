//! Application services: authorization, catalog resolution and command
//! dispatch wrapped behind caller-facing operations.

pub mod orders;

pub use orders::{OrderService, OrdersReadStore, PlaceOrderRequest, ServiceError, StatusUpdated};
