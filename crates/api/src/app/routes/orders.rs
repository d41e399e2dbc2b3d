use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use zaoshop_orders::OrderLine;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let principal_id = principal.principal_id();
    let lines: Vec<OrderLine> = body.items.into_iter().map(Into::into).collect();

    let result =
        tokio::task::spawn_blocking(move || services.place_order(principal_id, &lines)).await;
    match result {
        Ok(Ok(order)) => (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response(),
        Ok(Err(e)) => errors::place_order_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}

pub async fn my_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    let principal_id = principal.principal_id();

    let result = tokio::task::spawn_blocking(move || services.orders_for(principal_id)).await;
    match result {
        Ok(Ok(orders)) => {
            let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}

pub async fn list_all_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }

    let result = tokio::task::spawn_blocking(move || services.all_orders()).await;
    match result {
        Ok(Ok(orders)) => {
            let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}
