use serde::Deserialize;
use serde_json::json;

use stitchflow_infra::projections::OrderReadModel;
use stitchflow_infra::services::StatusUpdated;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `PATCH /orders/:id/update-status`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn order_to_json(rm: OrderReadModel) -> serde_json::Value {
    json!({
        "id": rm.order_id.to_string(),
        "customer_id": rm.customer_id.to_string(),
        "customer_name": rm.customer_name,
        "item_name": rm.item_name,
        "size": rm.size,
        "quantity": rm.quantity,
        "unit_price": rm.pricing.unit_price,
        "fabric_price_per_meter": rm.pricing.fabric_price_per_meter,
        "stitching_charge": rm.pricing.stitching_charge,
        "rental_price_per_day": rm.pricing.rental_price_per_day,
        "rental_deposit": rm.pricing.rental_deposit,
        "total_price": rm.total_price,
        "order_type": rm.order_type,
        "workflow": rm.workflow,
        "status": rm.status,
        "status_label": rm.status.label(),
        "next_allowed_statuses": rm.next_statuses,
        "placed_at": rm.placed_at,
        "updated_at": rm.updated_at,
    })
}

pub fn status_updated_to_json(updated: StatusUpdated) -> serde_json::Value {
    json!({
        "success": true,
        "order_id": updated.order_id.to_string(),
        "previous_status": updated.previous_status,
        "new_status": updated.new_status,
        "next_allowed_statuses": updated.next_allowed_statuses,
    })
}
