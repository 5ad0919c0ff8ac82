use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use stitchflow_core::{AggregateId, UserId};
use stitchflow_events::EventEnvelope;
use stitchflow_orders::{
    Order, OrderEvent, OrderId, OrderPricing, OrderStatus, OrderType, StatusWorkflows, Workflow,
};

use crate::read_model::ReadModelStore;

pub const ORDER_AGGREGATE_TYPE: &str = "orders.order";

/// Order summary as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReadModel {
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub customer_name: String,
    pub item_name: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub pricing: OrderPricing,
    /// Smallest currency unit.
    pub total_price: u64,
    pub order_type: OrderType,
    pub workflow: Workflow,
    pub status: OrderStatus,
    pub next_statuses: Vec<OrderStatus>,
    pub placed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderReadModel {
    /// Summary of a rehydrated order; `None` if it was never placed.
    pub fn from_order(order: &Order) -> Option<Self> {
        let customer_id = order.customer_id()?;
        let placed_at = order.placed_at()?;
        Some(Self {
            order_id: order.id_typed(),
            customer_id,
            customer_name: order.customer_name().to_string(),
            item_name: order.item_name().map(str::to_string),
            size: order.size().map(str::to_string),
            quantity: order.quantity(),
            pricing: *order.pricing(),
            total_price: order.total_price(),
            order_type: order.order_type(),
            workflow: order.workflow(),
            status: order.status(),
            next_statuses: order.next_statuses().to_vec(),
            placed_at,
            updated_at: order.updated_at().unwrap_or(placed_at),
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrdersProjectionError {
    #[error("failed to deserialize order event: {0}")]
    Deserialize(String),
    #[error("event order_id does not match envelope aggregate_id")]
    StreamMismatch,
    #[error("non-monotonic sequence number (last={last}, found={found})")]
    NonMonotonicSequence { last: u64, found: u64 },
    #[error("status change for unknown order {0}")]
    UnknownOrder(OrderId),
}

/// Builds [`OrderReadModel`]s from published order events.
///
/// Tracks the last applied sequence number per order: redelivered events
/// are skipped, a gap is an error.
#[derive(Debug)]
pub struct OrdersProjection<S>
where
    S: ReadModelStore<OrderId, OrderReadModel>,
{
    store: S,
    workflows: Arc<StatusWorkflows>,
    cursors: RwLock<HashMap<AggregateId, u64>>,
}

impl<S> OrdersProjection<S>
where
    S: ReadModelStore<OrderId, OrderReadModel>,
{
    pub fn new(store: S, workflows: Arc<StatusWorkflows>) -> Self {
        Self {
            store,
            workflows,
            cursors: RwLock::new(HashMap::new()),
        }
    }

    fn cursor(&self, aggregate_id: AggregateId) -> u64 {
        match self.cursors.read() {
            Ok(cursors) => cursors.get(&aggregate_id).copied().unwrap_or(0),
            Err(_) => 0,
        }
    }

    fn advance(&self, aggregate_id: AggregateId, seq: u64) {
        if let Ok(mut cursors) = self.cursors.write() {
            cursors.insert(aggregate_id, seq);
        }
    }

    pub fn get(&self, order_id: &OrderId) -> Option<OrderReadModel> {
        self.store.get(order_id)
    }

    /// All orders, newest first.
    pub fn list(&self) -> Vec<OrderReadModel> {
        let mut orders = self.store.list();
        orders.sort_by(|a, b| b.order_id.cmp(&a.order_id));
        orders
    }

    pub fn apply_envelope(
        &self,
        envelope: &EventEnvelope<JsonValue>,
    ) -> Result<(), OrdersProjectionError> {
        if envelope.aggregate_type() != ORDER_AGGREGATE_TYPE {
            return Ok(());
        }

        let aggregate_id = envelope.aggregate_id();
        let seq = envelope.sequence_number();

        let last = self.cursor(aggregate_id);
        if seq == 0 {
            return Err(OrdersProjectionError::NonMonotonicSequence { last, found: seq });
        }
        if seq <= last {
            return Ok(());
        }
        if seq != last + 1 {
            return Err(OrdersProjectionError::NonMonotonicSequence { last, found: seq });
        }

        let ev: OrderEvent = serde_json::from_value(envelope.payload().clone())
            .map_err(|e| OrdersProjectionError::Deserialize(e.to_string()))?;
        if ev.order_id().0 != aggregate_id {
            return Err(OrdersProjectionError::StreamMismatch);
        }

        match ev {
            OrderEvent::OrderPlaced(e) => {
                let workflow = Workflow::select(e.order_type, &e.details);
                self.store.upsert(
                    e.order_id,
                    OrderReadModel {
                        order_id: e.order_id,
                        customer_id: e.customer_id,
                        customer_name: e.customer_name,
                        item_name: e.item_name,
                        size: e.size,
                        quantity: e.quantity,
                        pricing: e.pricing,
                        total_price: e.total_price,
                        order_type: e.order_type,
                        workflow,
                        status: e.status,
                        next_statuses: self.workflows.next_statuses(workflow, e.status).to_vec(),
                        placed_at: e.occurred_at,
                        updated_at: e.occurred_at,
                    },
                );
            }
            OrderEvent::OrderStatusChanged(e) => {
                let mut rm = self
                    .store
                    .get(&e.order_id)
                    .ok_or(OrdersProjectionError::UnknownOrder(e.order_id))?;
                rm.status = e.to;
                rm.next_statuses = self.workflows.next_statuses(rm.workflow, e.to).to_vec();
                rm.updated_at = e.occurred_at;
                self.store.upsert(e.order_id, rm);
            }
        }

        self.advance(aggregate_id, seq);
        Ok(())
    }

    /// Drop all state and replay the given history.
    pub fn rebuild_from_scratch(
        &self,
        envelopes: impl IntoIterator<Item = EventEnvelope<JsonValue>>,
    ) -> Result<(), OrdersProjectionError> {
        let mut envs: Vec<_> = envelopes.into_iter().collect();

        self.store.clear();
        if let Ok(mut cursors) = self.cursors.write() {
            cursors.clear();
        }

        envs.sort_by_key(|e| (e.aggregate_id(), e.sequence_number()));
        for env in &envs {
            self.apply_envelope(env)?;
        }
        Ok(())
    }
}
