//! Customer orders and their status workflow.
//!
//! Pure domain logic: an order is classified once when placed, the
//! classification picks a status graph, and every status change is checked
//! against that graph. No IO, no HTTP, no storage.

pub mod classify;
pub mod details;
pub mod error;
pub mod order;
pub mod pricing;
pub mod status;
pub mod transition;
pub mod workflow;

pub use classify::{OrderType, classify};
pub use details::{Meters, OrderDetails, OrderItem, StitchType};
pub use error::{OrderError, TransitionError};
pub use order::{
    Order, OrderCommand, OrderEvent, OrderId, OrderPlaced, OrderStatusChanged, PlaceOrder,
    UpdateStatus,
};
pub use pricing::OrderPricing;
pub use status::{OrderStatus, UnknownStatus};
pub use transition::{AcceptedTransition, StatusSnapshot, validate_transition};
pub use workflow::{StatusWorkflows, Workflow, WorkflowPolicy};
