use axum::{
    routing::{get, post, put},
    Router,
};

pub mod orders;
pub mod products;
pub mod system;

/// Routes that need no authentication.
pub fn public_router() -> Router {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
}

/// Routes behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/products", post(products::create_product))
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/orders", post(orders::place_order).get(orders::list_all_orders))
        .route("/orders/mine", get(orders::my_orders))
}
