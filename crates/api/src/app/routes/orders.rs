use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};

use stitchflow_core::AggregateId;
use stitchflow_infra::services::{PlaceOrderRequest, ServiceError};
use stitchflow_orders::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/next-statuses", get(next_statuses))
        .route("/:id/update-status", patch(update_status))
}

fn parse_order_id(id: &str) -> Result<OrderId, axum::response::Response> {
    id.parse::<AggregateId>()
        .map(OrderId::new)
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<PlaceOrderRequest>,
) -> axum::response::Response {
    match services.orders().place_order(body, principal.principal()) {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_to_json(order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let orders = services
        .orders()
        .list_orders(principal.principal())
        .into_iter()
        .map(dto::order_to_json)
        .collect::<Vec<_>>();
    Json(orders).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders().get_order(order_id, principal.principal()) {
        Ok(order) => Json(dto::order_to_json(order)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn next_statuses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders().next_statuses(order_id, principal.principal()) {
        Ok(next) => Json(serde_json::json!({
            "order_id": order_id.to_string(),
            "next_allowed_statuses": next,
        }))
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// A missing or unreadable body counts as a missing status.
pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Option<Json<dto::UpdateStatusRequest>>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let requested = body.and_then(|Json(b)| b.status);

    match services
        .orders()
        .update_status(order_id, requested.as_deref(), principal.principal())
    {
        Ok(updated) => Json(dto::status_updated_to_json(updated)).into_response(),
        Err(ServiceError::Rejected(reason)) => {
            errors::rejection_to_response(&reason, requested.as_deref())
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
