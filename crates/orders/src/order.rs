use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stitchflow_core::{Aggregate, AggregateId, AggregateRoot, DomainError, UserId};
use stitchflow_events::Event;

use crate::classify::{OrderType, classify};
use crate::details::OrderDetails;
use crate::error::OrderError;
use crate::pricing::OrderPricing;
use crate::status::OrderStatus;
use crate::transition::{StatusSnapshot, validate_transition};
use crate::workflow::{StatusWorkflows, Workflow};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Order.
///
/// Holds the shared workflow tables so `handle` can validate status changes
/// without reaching outside the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    workflows: Arc<StatusWorkflows>,
    customer_id: Option<UserId>,
    customer_name: String,
    item_name: Option<String>,
    size: Option<String>,
    quantity: u32,
    notes: Option<String>,
    details: OrderDetails,
    pricing: OrderPricing,
    total_price: u64,
    order_type: OrderType,
    status: OrderStatus,
    placed_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Order {
    /// Create an empty, not-yet-placed instance for rehydration.
    pub fn empty(id: OrderId, workflows: Arc<StatusWorkflows>) -> Self {
        Self {
            id,
            workflows,
            customer_id: None,
            customer_name: String::new(),
            item_name: None,
            size: None,
            quantity: 0,
            notes: None,
            details: OrderDetails::default(),
            pricing: OrderPricing::default(),
            total_price: 0,
            order_type: OrderType::Other,
            status: OrderStatus::INITIAL,
            placed_at: None,
            updated_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn is_placed(&self) -> bool {
        self.created
    }

    pub fn customer_id(&self) -> Option<UserId> {
        self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn item_name(&self) -> Option<&str> {
        self.item_name.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn details(&self) -> &OrderDetails {
        &self.details
    }

    pub fn pricing(&self) -> &OrderPricing {
        &self.pricing
    }

    /// Amount due, in the smallest currency unit.
    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Type recorded when the order was placed.
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        self.placed_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn workflow(&self) -> Workflow {
        self.snapshot().workflow()
    }

    /// Statuses this order may move to next.
    pub fn next_statuses(&self) -> &[OrderStatus] {
        self.workflows.next_statuses(self.workflow(), self.status)
    }

    /// Validate and apply a status change in place, returning the statuses
    /// allowed from the new status.
    pub fn transition_to(
        &mut self,
        requested: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<OrderStatus>, OrderError> {
        let events = self.handle(&OrderCommand::UpdateStatus(UpdateStatus {
            order_id: self.id,
            requested: requested.map(str::to_string),
            occurred_at,
        }))?;
        for event in &events {
            self.apply(event);
        }
        Ok(self.next_statuses().to_vec())
    }

    fn snapshot(&self) -> StatusSnapshot<'_> {
        StatusSnapshot {
            order_type: self.order_type,
            details: &self.details,
            status: self.status,
        }
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub customer_name: String,
    pub details: OrderDetails,
    /// Name of the referenced catalog item at the time of ordering.
    pub item_name: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub notes: Option<String>,
    /// Catalog prices quoted to the customer.
    pub pricing: OrderPricing,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateStatus. `requested` is the raw target as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatus {
    pub order_id: OrderId,
    pub requested: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    UpdateStatus(UpdateStatus),
}

/// Event: OrderPlaced. Carries the type decided at placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub customer_name: String,
    pub details: OrderDetails,
    pub order_type: OrderType,
    pub item_name: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub notes: Option<String>,
    #[serde(default)]
    pub pricing: OrderPricing,
    #[serde(default)]
    pub total_price: u64,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    OrderStatusChanged(OrderStatusChanged),
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderPlaced(e) => e.order_id,
            OrderEvent::OrderStatusChanged(e) => e.order_id,
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "orders.order.placed",
            OrderEvent::OrderStatusChanged(_) => "orders.order.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::OrderStatusChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = OrderError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id;
                self.customer_id = Some(e.customer_id);
                self.customer_name = e.customer_name.clone();
                self.item_name = e.item_name.clone();
                self.size = e.size.clone();
                self.quantity = e.quantity;
                self.notes = e.notes.clone();
                self.details = e.details.clone();
                self.pricing = e.pricing;
                self.total_price = e.total_price;
                self.order_type = e.order_type;
                self.status = e.status;
                self.placed_at = Some(e.occurred_at);
                self.updated_at = Some(e.occurred_at);
                self.created = true;
            }
            OrderEvent::OrderStatusChanged(e) => {
                self.status = e.to;
                self.updated_at = Some(e.occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::UpdateStatus(cmd) => self.handle_update_status(cmd),
        }
    }
}

impl Order {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, OrderError> {
        if self.created {
            return Err(DomainError::conflict("order already exists").into());
        }
        if cmd.customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer_name must not be empty").into());
        }
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1").into());
        }

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            customer_id: cmd.customer_id,
            customer_name: cmd.customer_name.trim().to_string(),
            details: cmd.details.clone(),
            order_type: classify(&cmd.details),
            item_name: cmd.item_name.clone(),
            size: cmd.size.clone(),
            quantity: cmd.quantity,
            notes: cmd.notes.clone(),
            pricing: cmd.pricing,
            total_price: cmd.pricing.total(&cmd.details, cmd.quantity),
            status: OrderStatus::INITIAL,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_status(&self, cmd: &UpdateStatus) -> Result<Vec<OrderEvent>, OrderError> {
        if !self.created {
            return Err(DomainError::not_found().into());
        }
        self.ensure_order_id(cmd.order_id)?;

        let accepted = validate_transition(&self.workflows, self.snapshot(), cmd.requested.as_deref())?;

        Ok(vec![OrderEvent::OrderStatusChanged(OrderStatusChanged {
            order_id: cmd.order_id,
            from: accepted.from,
            to: accepted.to,
            occurred_at: cmd.occurred_at,
        })])
    }
}
