use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use zaoshop_core::DomainError;
use zaoshop_orders::{PlaceOrderError, RejectReason, StoreError};

pub fn place_order_error_to_response(err: PlaceOrderError) -> axum::response::Response {
    match err {
        PlaceOrderError::Rejected(reason) => reject_reason_to_response(reason),
        PlaceOrderError::Conflict(product_id) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("stock for product {product_id} changed concurrently, retry with fresh data"),
        ),
        PlaceOrderError::Storage(e) => store_error_to_response(e),
    }
}

fn reject_reason_to_response(reason: RejectReason) -> axum::response::Response {
    match reason {
        RejectReason::MalformedRequest(msg) => {
            json_error(StatusCode::BAD_REQUEST, "malformed_request", msg)
        }
        RejectReason::UnknownProduct(product_id) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "unknown_product",
                "message": format!("unknown product {product_id}"),
                "product_id": product_id.to_string(),
            })),
        )
            .into_response(),
        RejectReason::InsufficientStock {
            product_id,
            requested,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": format!(
                    "insufficient stock for product {product_id}: requested {requested}, available {available}"
                ),
                "product_id": product_id.to_string(),
                "requested": requested,
                "available": available,
            })),
        )
            .into_response(),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

/// A `spawn_blocking` join failure (panicked or cancelled worker).
pub fn task_failure() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "blocking task failed",
    )
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
