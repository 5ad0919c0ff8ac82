//! Read model builders fed by the event bus.
//!
//! Projections are rebuildable from the event store and idempotent under
//! at-least-once delivery.

pub mod orders;

pub use orders::{ORDER_AGGREGATE_TYPE, OrderReadModel, OrdersProjection, OrdersProjectionError};
