use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use zaoshop_catalog::{NewProduct, Product, ProductPatch};
use zaoshop_core::{OrderId, PrincipalId, ProductId};
use zaoshop_orders::{Order, OrderDraft, OrderRepository, ProductLedger, StoreError};

use crate::catalog_store::CatalogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderStatus {
    Pending,
    Committed,
}

#[derive(Debug, Clone)]
struct StoredOrder {
    order: Order,
    status: OrderStatus,
}

/// In-memory store backing all three ports.
///
/// Intended for dev/test. `try_decrement` takes the products write lock
/// for the whole check-and-write, which is what makes the decrement a
/// single atomic conditional operation.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    orders: RwLock<HashMap<OrderId, StoredOrder>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> StoreError {
    StoreError::new("lock poisoned")
}

impl ProductLedger for InMemoryStore {
    fn get_by_ids(&self, ids: &[ProductId]) -> Result<HashMap<ProductId, Product>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).cloned().map(|p| (*id, p)))
            .collect())
    }

    // No applied-line bookkeeping here: the store dies with the process,
    // so there is never a pending order to reconcile at startup.
    fn try_decrement(
        &self,
        _order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        let Some(product) = products.get_mut(&product_id) else {
            return Ok(false);
        };
        match product.stock.checked_sub(quantity) {
            Some(remaining) => {
                product.stock = remaining;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn restock(
        &self,
        _order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        if let Some(product) = products.get_mut(&product_id) {
            product.stock = product.stock.saturating_add(quantity);
        }
        Ok(())
    }
}

impl OrderRepository for InMemoryStore {
    fn insert_pending(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let order = Order {
            id: OrderId::new(),
            principal_id: draft.principal_id,
            created_at: Utc::now(),
            lines: draft.lines,
            total: draft.total,
        };

        let mut orders = self.orders.write().map_err(poisoned)?;
        orders.insert(
            order.id,
            StoredOrder {
                order: order.clone(),
                status: OrderStatus::Pending,
            },
        );
        Ok(order)
    }

    fn mark_committed(&self, id: OrderId) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        let stored = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::new(format!("order {id} not found")))?;
        stored.status = OrderStatus::Committed;
        Ok(())
    }

    fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        orders.remove(&id);
        Ok(())
    }

    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(orders
            .get(&id)
            .filter(|s| s.status == OrderStatus::Committed)
            .map(|s| s.order.clone()))
    }

    fn for_principal(&self, principal_id: PrincipalId) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(poisoned)?;
        let mut result: Vec<Order> = orders
            .values()
            .filter(|s| s.status == OrderStatus::Committed)
            .filter(|s| s.order.principal_id == principal_id)
            .map(|s| s.order.clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(poisoned)?;
        let mut result: Vec<Order> = orders
            .values()
            .filter(|s| s.status == OrderStatus::Committed)
            .map(|s| s.order.clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

impl CatalogStore for InMemoryStore {
    fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product::from_new(new, Utc::now());
        let mut products = self.products.write().map_err(poisoned)?;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.get(&id).cloned())
    }

    fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        match products.get_mut(&id) {
            Some(product) => {
                patch.apply_to(product);
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        Ok(products.remove(&id).is_some())
    }
}
