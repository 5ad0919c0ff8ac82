use std::sync::Arc;

use serde_json::Value as JsonValue;

use stitchflow_catalog::CatalogLookup;
use stitchflow_events::{EventEnvelope, InMemoryEventBus};
use stitchflow_infra::{
    command_dispatcher::CommandDispatcher,
    event_store::InMemoryEventStore,
    projections::OrdersProjection,
    services::{OrderService, OrdersReadStore},
    workers::{ProjectionWorker, WorkerHandle},
};
use stitchflow_orders::{StatusWorkflows, WorkflowPolicy};

type Bus = InMemoryEventBus<EventEnvelope<JsonValue>>;

pub type Orders = OrderService<Arc<InMemoryEventStore>, Arc<Bus>>;

pub struct AppServices {
    orders: Orders,
    _projection_worker: WorkerHandle,
}

impl AppServices {
    pub fn orders(&self) -> &Orders {
        &self.orders
    }
}

/// In-process wiring: in-memory store and bus, one projection worker.
pub fn build_services(
    policy: WorkflowPolicy,
    catalog: Arc<dyn CatalogLookup>,
) -> std::io::Result<AppServices> {
    let store = Arc::new(InMemoryEventStore::new());
    let bus: Arc<Bus> = Arc::new(InMemoryEventBus::new());
    let workflows = Arc::new(StatusWorkflows::new(policy));

    let projection = Arc::new(OrdersProjection::new(
        Arc::new(OrdersReadStore::new()),
        workflows.clone(),
    ));

    // Background subscriber: bus -> orders projection
    let projection_worker = {
        let projection = projection.clone();
        ProjectionWorker::spawn("orders-projection", &bus, move |env: EventEnvelope<JsonValue>| {
            projection.apply_envelope(&env)
        })?
    };

    let dispatcher = CommandDispatcher::new(store, bus);
    Ok(AppServices {
        orders: OrderService::new(dispatcher, catalog, workflows, projection),
        _projection_worker: projection_worker,
    })
}
