use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use zaoshop_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }

    let new: zaoshop_catalog::NewProduct = body.into();
    if let Err(e) = new.validate() {
        return errors::domain_error_to_response(e);
    }

    let result = tokio::task::spawn_blocking(move || services.insert_product(new)).await;
    match result {
        Ok(Ok(product)) => {
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let result = tokio::task::spawn_blocking(move || services.get_product(id)).await;
    match result {
        Ok(Ok(Some(product))) => {
            (StatusCode::OK, Json(dto::product_to_json(&product))).into_response()
        }
        Ok(Ok(None)) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let result = tokio::task::spawn_blocking(move || services.list_products()).await;
    match result {
        Ok(Ok(products)) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }

    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let patch: zaoshop_catalog::ProductPatch = body.into();
    if let Err(e) = patch.validate() {
        return errors::domain_error_to_response(e);
    }

    let result = tokio::task::spawn_blocking(move || services.update_product(id, patch)).await;
    match result {
        Ok(Ok(Some(product))) => {
            (StatusCode::OK, Json(dto::product_to_json(&product))).into_response()
        }
        Ok(Ok(None)) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }

    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let result = tokio::task::spawn_blocking(move || services.delete_product(id)).await;
    match result {
        Ok(Ok(true)) => StatusCode::NO_CONTENT.into_response(),
        Ok(Ok(false)) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Ok(Err(e)) => errors::store_error_to_response(e),
        Err(_) => errors::task_failure(),
    }
}
