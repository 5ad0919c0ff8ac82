use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{info, warn};

use stitchflow_auth::{AuthzError, Permission, Principal, authorize};
use stitchflow_catalog::{CatalogItem, CatalogLookup, CatalogRef};
use stitchflow_core::{AggregateId, UserId};
use stitchflow_events::{EventBus, EventEnvelope};
use stitchflow_orders::{
    Meters, Order, OrderCommand, OrderDetails, OrderEvent, OrderId, OrderItem, OrderPricing,
    OrderStatus, PlaceOrder, StatusWorkflows, StitchType, TransitionError, UpdateStatus,
};

use crate::command_dispatcher::{CommandDispatcher, DispatchError};
use crate::event_store::EventStore;
use crate::projections::{ORDER_AGGREGATE_TYPE, OrderReadModel, OrdersProjection};
use crate::read_model::{InMemoryReadModelStore, ReadModelStore};

pub type OrdersReadStore = InMemoryReadModelStore<OrderId, OrderReadModel>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Forbidden(#[from] AuthzError),
    /// A status change was refused; carries the reason and the alternatives.
    #[error(transparent)]
    Rejected(TransitionError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("order not found")]
    NotFound,
    /// Someone else changed the order first; reload and retry.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DispatchError> for ServiceError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::Concurrency(msg) => ServiceError::Conflict(msg),
            DispatchError::Validation(msg) => ServiceError::Validation(msg),
            DispatchError::NotFound => ServiceError::NotFound,
            DispatchError::Rejected(e) => ServiceError::Rejected(e),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

fn default_quantity() -> u32 {
    1
}

/// What a customer submits when ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub item: Option<CatalogRef>,
    #[serde(default)]
    pub stitch_type: Option<StitchType>,
    #[serde(default)]
    pub meters: Meters,
    #[serde(default)]
    pub rental_days: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Result of an accepted status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdated {
    pub order_id: OrderId,
    pub previous_status: OrderStatus,
    pub new_status: OrderStatus,
    pub next_allowed_statuses: Vec<OrderStatus>,
}

/// Caller-facing order operations.
pub struct OrderService<S, B, R = Arc<OrdersReadStore>>
where
    R: ReadModelStore<OrderId, OrderReadModel>,
{
    dispatcher: CommandDispatcher<S, B>,
    catalog: Arc<dyn CatalogLookup>,
    workflows: Arc<StatusWorkflows>,
    projection: Arc<OrdersProjection<R>>,
}

impl<S, B, R> OrderService<S, B, R>
where
    S: EventStore,
    B: EventBus<EventEnvelope<JsonValue>>,
    R: ReadModelStore<OrderId, OrderReadModel>,
{
    pub fn new(
        dispatcher: CommandDispatcher<S, B>,
        catalog: Arc<dyn CatalogLookup>,
        workflows: Arc<StatusWorkflows>,
        projection: Arc<OrdersProjection<R>>,
    ) -> Self {
        Self {
            dispatcher,
            catalog,
            workflows,
            projection,
        }
    }

    fn resolve_item(&self, reference: &CatalogRef) -> Result<CatalogItem, ServiceError> {
        let item = self
            .catalog
            .resolve(reference)
            .ok_or_else(|| ServiceError::Validation("unknown catalog item".to_string()))?;
        if !item.is_active() {
            return Err(ServiceError::Validation(format!(
                "'{}' is no longer available",
                item.name()
            )));
        }
        Ok(item)
    }

    /// Place an order on behalf of `caller`, who becomes its customer.
    pub fn place_order(
        &self,
        request: PlaceOrderRequest,
        caller: &Principal,
    ) -> Result<OrderReadModel, ServiceError> {
        authorize(caller, &Permission::ORDERS_PLACE)?;

        let item = request.item.as_ref().map(|r| self.resolve_item(r)).transpose()?;
        let details = OrderDetails {
            item: item.as_ref().map(OrderItem::from),
            stitch_type: request.stitch_type,
            meters: request.meters,
            rental_days: request.rental_days,
        };
        let pricing = OrderPricing::quote(item.as_ref(), &details);

        let customer_name = if caller.name.trim().is_empty() {
            caller.principal_id.to_string()
        } else {
            caller.name.clone()
        };

        let id = AggregateId::new();
        let command = OrderCommand::PlaceOrder(PlaceOrder {
            order_id: OrderId::new(id),
            customer_id: caller.principal_id.as_user_id(),
            customer_name,
            details,
            item_name: item.as_ref().map(|i| i.name().to_string()),
            size: request.size,
            quantity: request.quantity,
            notes: request.notes,
            pricing,
            occurred_at: Utc::now(),
        });

        let out = self
            .dispatcher
            .execute(id, ORDER_AGGREGATE_TYPE, command, empty_order(&self.workflows))?;
        let view = OrderReadModel::from_order(&out.aggregate)
            .ok_or_else(|| ServiceError::Internal("placed order has no summary".to_string()))?;

        info!(
            order_id = %view.order_id,
            order_type = %view.order_type,
            workflow = ?view.workflow,
            total_price = view.total_price,
            "order placed"
        );
        Ok(view)
    }

    /// Move an order to `requested`. Only administrators may do this.
    pub fn update_status(
        &self,
        order_id: OrderId,
        requested: Option<&str>,
        caller: &Principal,
    ) -> Result<StatusUpdated, ServiceError> {
        if authorize(caller, &Permission::ORDERS_STATUS_UPDATE).is_err() {
            warn!(order_id = %order_id, principal = %caller.principal_id, "status update refused: not an administrator");
            return Err(ServiceError::Rejected(TransitionError::Unauthorized));
        }

        let command = OrderCommand::UpdateStatus(UpdateStatus {
            order_id,
            requested: requested.map(str::to_string),
            occurred_at: Utc::now(),
        });

        let out = match self.dispatcher.execute(
            order_id.0,
            ORDER_AGGREGATE_TYPE,
            command,
            empty_order(&self.workflows),
        ) {
            Ok(out) => out,
            Err(DispatchError::Rejected(reason)) => {
                warn!(
                    order_id = %order_id,
                    requested = requested.unwrap_or_default(),
                    code = reason.code(),
                    "status change rejected"
                );
                return Err(ServiceError::Rejected(reason));
            }
            Err(other) => return Err(other.into()),
        };

        let order = out.aggregate;
        let previous_status = out
            .events
            .iter()
            .find_map(|e| match e {
                OrderEvent::OrderStatusChanged(changed) => Some(changed.from),
                OrderEvent::OrderPlaced(_) => None,
            })
            .unwrap_or(order.status());

        info!(
            order_id = %order_id,
            from = %previous_status,
            to = %order.status(),
            "order status changed"
        );

        Ok(StatusUpdated {
            order_id,
            previous_status,
            new_status: order.status(),
            next_allowed_statuses: order.next_statuses().to_vec(),
        })
    }

    /// Current state, rebuilt from the event stream.
    pub fn get_order(&self, order_id: OrderId, caller: &Principal) -> Result<OrderReadModel, ServiceError> {
        let order = self.dispatcher.load(order_id.0, empty_order(&self.workflows))?;
        let view = OrderReadModel::from_order(&order).ok_or(ServiceError::NotFound)?;
        if !can_see(caller, view.customer_id) {
            return Err(ServiceError::NotFound);
        }
        Ok(view)
    }

    /// Statuses the order may move to next.
    pub fn next_statuses(&self, order_id: OrderId, caller: &Principal) -> Result<Vec<OrderStatus>, ServiceError> {
        self.get_order(order_id, caller).map(|view| view.next_statuses)
    }

    /// Orders visible to `caller`, newest first. Eventually consistent.
    pub fn list_orders(&self, caller: &Principal) -> Vec<OrderReadModel> {
        self.projection
            .list()
            .into_iter()
            .filter(|o| can_see(caller, o.customer_id))
            .collect()
    }

    /// Rebuild the orders projection from the event store.
    pub fn rebuild_projection(&self) -> Result<(), ServiceError> {
        let history = self
            .dispatcher
            .store()
            .load_all(ORDER_AGGREGATE_TYPE)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.projection
            .rebuild_from_scratch(history.iter().map(|e| e.to_envelope()))
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

fn empty_order(workflows: &Arc<StatusWorkflows>) -> impl FnOnce(AggregateId) -> Order + use<> {
    let workflows = workflows.clone();
    move |id| Order::empty(OrderId::new(id), workflows)
}

fn can_see(caller: &Principal, customer_id: UserId) -> bool {
    authorize(caller, &Permission::ORDERS_READ_ALL).is_ok()
        || (authorize(caller, &Permission::ORDERS_READ_OWN).is_ok()
            && caller.principal_id.as_user_id() == customer_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use stitchflow_auth::{PrincipalId, Role};
    use stitchflow_catalog::{
        Product, ProductCategory, ProductId, ProductKind, RentalItem, RentalItemId,
    };
    use stitchflow_events::InMemoryEventBus;
    use stitchflow_orders::{OrderType, WorkflowPolicy};

    use crate::catalog::InMemoryCatalog;
    use crate::event_store::InMemoryEventStore;

    type Service = OrderService<
        Arc<InMemoryEventStore>,
        Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>,
    >;

    struct Fixture {
        service: Service,
        readymade: ProductId,
        retired: ProductId,
        sherwani: RentalItemId,
    }

    fn fixture_with(policy: WorkflowPolicy) -> Fixture {
        let readymade = ProductId::new(AggregateId::new());
        let retired = ProductId::new(AggregateId::new());
        let sherwani = RentalItemId::new(AggregateId::new());

        let catalog = InMemoryCatalog::with_items([
            CatalogItem::Product(Product {
                id: readymade,
                name: "Linen shirt".to_string(),
                category: ProductCategory::new("readymade"),
                kind: ProductKind::Readymade,
                price: Some(149_900),
                active: true,
            }),
            CatalogItem::Product(Product {
                id: retired,
                name: "Old stock".to_string(),
                category: ProductCategory::new("shirt"),
                kind: ProductKind::Readymade,
                price: None,
                active: false,
            }),
            CatalogItem::RentalItem(RentalItem {
                id: sherwani,
                name: "Ivory sherwani".to_string(),
                color: "ivory".to_string(),
                price_per_day: 250_000,
                deposit_amount: 1_000_000,
                active: true,
            }),
        ]);

        let workflows = Arc::new(StatusWorkflows::new(policy));
        let dispatcher = CommandDispatcher::new(
            Arc::new(InMemoryEventStore::new()),
            Arc::new(InMemoryEventBus::new()),
        );
        let projection = Arc::new(OrdersProjection::new(
            Arc::new(OrdersReadStore::new()),
            workflows.clone(),
        ));

        Fixture {
            service: OrderService::new(dispatcher, Arc::new(catalog), workflows, projection),
            readymade,
            retired,
            sherwani,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(WorkflowPolicy::default())
    }

    fn admin() -> Principal {
        Principal::from_roles(PrincipalId::new(), "Shop Owner", vec![Role::ADMIN])
    }

    fn customer(name: &str) -> Principal {
        Principal::from_roles(PrincipalId::new(), name, vec![Role::CUSTOMER])
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            item: None,
            stitch_type: None,
            meters: Meters::ZERO,
            rental_days: 0,
            size: None,
            quantity: 1,
            notes: None,
        }
    }

    fn advance(svc: &Service, id: OrderId, path: &[OrderStatus]) {
        let admin = admin();
        for status in path {
            svc.update_status(id, Some(status.as_str()), &admin).unwrap();
        }
    }

    #[test]
    fn custom_order_moves_into_the_cutting_room() {
        let f = fixture();
        let placed = f
            .service
            .place_order(
                PlaceOrderRequest {
                    stitch_type: Some(StitchType::Shirt),
                    meters: "2.5".parse().unwrap(),
                    ..request()
                },
                &customer("Asha"),
            )
            .unwrap();
        assert_eq!(placed.order_type, OrderType::Custom);
        assert_eq!(placed.status, OrderStatus::Placed);

        let updated = f
            .service
            .update_status(placed.order_id, Some("processing"), &admin())
            .unwrap();
        assert_eq!(updated.previous_status, OrderStatus::Placed);
        assert_eq!(updated.new_status, OrderStatus::Processing);
        assert_eq!(updated.next_allowed_statuses, vec![OrderStatus::Stitching]);
    }

    #[test]
    fn readymade_order_cannot_be_stitched() {
        let f = fixture();
        let placed = f
            .service
            .place_order(
                PlaceOrderRequest {
                    item: Some(CatalogRef::Product(f.readymade)),
                    ..request()
                },
                &customer("Vikram"),
            )
            .unwrap();
        assert_eq!(placed.order_type, OrderType::ReadyMade);
        assert_eq!(placed.item_name.as_deref(), Some("Linen shirt"));
        assert_eq!(placed.pricing.unit_price, 149_900);
        assert_eq!(placed.total_price, 149_900);
        advance(&f.service, placed.order_id, &[OrderStatus::Processing]);

        let err = f
            .service
            .update_status(placed.order_id, Some("stitching"), &admin())
            .unwrap_err();
        let reason = match err {
            ServiceError::Rejected(reason) => reason,
            other => panic!("expected a rejection, got {other:?}"),
        };
        assert_eq!(reason.code(), "invalid_transition");
        assert_eq!(reason.allowed_statuses(), &[OrderStatus::ReadyForPickup]);
        assert_eq!(reason.order_type(), Some(OrderType::ReadyMade));
    }

    #[test]
    fn rental_comes_back_after_pickup() {
        let f = fixture();
        let placed = f
            .service
            .place_order(
                PlaceOrderRequest {
                    item: Some(CatalogRef::RentalItem(f.sherwani)),
                    rental_days: 3,
                    ..request()
                },
                &customer("Kabir"),
            )
            .unwrap();
        assert_eq!(placed.order_type, OrderType::Rental);
        advance(
            &f.service,
            placed.order_id,
            &[
                OrderStatus::Processing,
                OrderStatus::ReadyForPickup,
                OrderStatus::PickedUp,
            ],
        );

        let updated = f
            .service
            .update_status(placed.order_id, Some("returned"), &admin())
            .unwrap();
        assert_eq!(updated.new_status, OrderStatus::Returned);
        assert_eq!(updated.next_allowed_statuses, vec![OrderStatus::DepositRefunded]);
    }

    #[test]
    fn rental_item_alone_books_a_one_day_rental() {
        let f = fixture();
        let placed = f
            .service
            .place_order(
                PlaceOrderRequest {
                    item: Some(CatalogRef::RentalItem(f.sherwani)),
                    ..request()
                },
                &customer("Meera"),
            )
            .unwrap();
        assert_eq!(placed.order_type, OrderType::Rental);
        assert_eq!(placed.pricing.rental_price_per_day, 250_000);
        assert_eq!(placed.pricing.rental_deposit, 1_000_000);
        assert_eq!(placed.total_price, 1_250_000);

        f.service.rebuild_projection().unwrap();
        let listed = f.service.list_orders(&admin());
        assert_eq!(listed[0].total_price, 1_250_000);

        advance(
            &f.service,
            placed.order_id,
            &[
                OrderStatus::Processing,
                OrderStatus::ReadyForPickup,
                OrderStatus::PickedUp,
                OrderStatus::Returned,
                OrderStatus::DepositRefunded,
            ],
        );
        assert_eq!(
            f.service.get_order(placed.order_id, &admin()).unwrap().status,
            OrderStatus::DepositRefunded
        );
    }

    #[test]
    fn plain_order_cannot_refund_a_deposit() {
        let f = fixture();
        let placed = f.service.place_order(request(), &customer("Nila")).unwrap();
        assert_eq!(placed.order_type, OrderType::Other);

        let err = f
            .service
            .update_status(placed.order_id, Some("deposit_refunded"), &admin())
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rejected(TransitionError::NotAllowedForOrderType { .. })
        ));
    }

    #[test]
    fn customers_cannot_move_orders() {
        let f = fixture();
        let asha = customer("Asha");
        let placed = f.service.place_order(request(), &asha).unwrap();

        let err = f
            .service
            .update_status(placed.order_id, Some("processing"), &asha)
            .unwrap_err();
        assert_eq!(err, ServiceError::Rejected(TransitionError::Unauthorized));
        assert_eq!(
            f.service.get_order(placed.order_id, &asha).unwrap().status,
            OrderStatus::Placed
        );
    }

    #[test]
    fn same_request_twice_succeeds_once() {
        let f = fixture();
        let placed = f.service.place_order(request(), &customer("Asha")).unwrap();

        f.service
            .update_status(placed.order_id, Some("processing"), &admin())
            .unwrap();
        let err = f
            .service
            .update_status(placed.order_id, Some("processing"), &admin())
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rejected(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn missing_and_unknown_orders() {
        let f = fixture();
        let placed = f.service.place_order(request(), &customer("Asha")).unwrap();

        let err = f
            .service
            .update_status(placed.order_id, Some("  "), &admin())
            .unwrap_err();
        assert_eq!(err, ServiceError::Rejected(TransitionError::MissingStatus));

        let ghost = OrderId::new(AggregateId::new());
        assert_eq!(
            f.service.update_status(ghost, Some("processing"), &admin()),
            Err(ServiceError::NotFound)
        );
        assert_eq!(f.service.get_order(ghost, &admin()), Err(ServiceError::NotFound));
    }

    #[test]
    fn catalog_reference_must_exist_and_be_active() {
        let f = fixture();
        let unknown = PlaceOrderRequest {
            item: Some(CatalogRef::Product(ProductId::new(AggregateId::new()))),
            ..request()
        };
        let retired = PlaceOrderRequest {
            item: Some(CatalogRef::Product(f.retired)),
            ..request()
        };

        assert!(matches!(
            f.service.place_order(unknown, &customer("Asha")),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            f.service.place_order(retired, &customer("Asha")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn principals_without_roles_cannot_order() {
        let f = fixture();
        let nobody = Principal::from_roles(PrincipalId::new(), "anon", vec![]);
        assert!(matches!(
            f.service.place_order(request(), &nobody),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn customers_only_see_their_own_orders() {
        let f = fixture();
        let asha = customer("Asha");
        let ravi = customer("Ravi");
        let mine = f.service.place_order(request(), &asha).unwrap();
        f.service.place_order(request(), &ravi).unwrap();
        f.service.rebuild_projection().unwrap();

        let listed = f.service.list_orders(&asha);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].order_id, mine.order_id);
        assert_eq!(f.service.list_orders(&admin()).len(), 2);
        assert_eq!(
            f.service.get_order(mine.order_id, &ravi),
            Err(ServiceError::NotFound)
        );
        assert_eq!(
            f.service.next_statuses(mine.order_id, &asha).unwrap(),
            vec![OrderStatus::Processing]
        );
    }

    #[test]
    fn reading_own_orders_needs_the_permission() {
        let f = fixture();
        let asha = customer("Asha");
        let placed = f.service.place_order(request(), &asha).unwrap();
        f.service.rebuild_projection().unwrap();

        let same_id = Principal::from_roles(asha.principal_id, "Asha", vec![Role::new("guest")]);
        assert_eq!(
            f.service.get_order(placed.order_id, &same_id),
            Err(ServiceError::NotFound)
        );
        assert!(f.service.list_orders(&same_id).is_empty());
        assert_eq!(f.service.list_orders(&asha).len(), 1);
    }

    #[test]
    fn cancellation_follows_policy() {
        let off = fixture();
        let placed = off.service.place_order(request(), &customer("Asha")).unwrap();
        assert!(off
            .service
            .update_status(placed.order_id, Some("cancelled"), &admin())
            .is_err());

        let on = fixture_with(WorkflowPolicy {
            allow_cancellation: true,
        });
        let placed = on.service.place_order(request(), &customer("Asha")).unwrap();
        let updated = on
            .service
            .update_status(placed.order_id, Some("cancelled"), &admin())
            .unwrap();
        assert_eq!(updated.new_status, OrderStatus::Cancelled);
        assert!(updated.next_allowed_statuses.is_empty());
    }
}
