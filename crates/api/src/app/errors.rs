use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stitchflow_infra::services::ServiceError;
use stitchflow_orders::TransitionError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Rejected(reason) => rejection_to_response(&reason, None),
        ServiceError::Forbidden(e) => json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()),
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

/// 403 for callers who may not move orders, 400 with the alternatives otherwise.
pub fn rejection_to_response(
    reason: &TransitionError,
    requested: Option<&str>,
) -> axum::response::Response {
    if matches!(reason, TransitionError::Unauthorized) {
        return json_error(StatusCode::FORBIDDEN, reason.code(), reason.to_string());
    }

    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": reason.code(),
            "message": reason.to_string(),
            "allowed_statuses": reason.allowed_statuses(),
            "order_type": reason.order_type(),
            "requested": requested,
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
