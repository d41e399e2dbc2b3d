use serde::Deserialize;

use zaoshop_catalog::{NewProduct, Product, ProductPatch};
use zaoshop_core::ProductId;
use zaoshop_orders::{Order, OrderLine};

// -------------------------
// Request DTOs
// -------------------------
//
// `deny_unknown_fields` rejects misspelled or smuggled fields (for example
// a client-supplied `unit_price` on an order line) before anything runs.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<OrderLineRequest> for OrderLine {
    fn from(req: OrderLineRequest) -> Self {
        OrderLine {
            product_id: req.product_id,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: u64,
    pub stock: u32,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name,
            description: req.description,
            unit_price: req.unit_price,
            stock: req.stock,
            category: req.category,
            image_url: req.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<u64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            name: req.name,
            description: req.description,
            unit_price: req.unit_price,
            stock: req.stock,
            category: req.category,
            image_url: req.image_url,
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.to_string(),
        "name": product.name,
        "description": product.description,
        "unit_price": product.unit_price,
        "stock": product.stock,
        "category": product.category,
        "image_url": product.image_url,
        "created_at": product.created_at,
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.id.to_string(),
        "principal_id": order.principal_id.to_string(),
        "created_at": order.created_at,
        "total": order.total,
        "lines": order
            .lines
            .iter()
            .map(|line| serde_json::json!({
                "product_id": line.product_id.to_string(),
                "quantity": line.quantity,
                "unit_price_at_purchase": line.unit_price_at_purchase,
            }))
            .collect::<Vec<_>>(),
    })
}
