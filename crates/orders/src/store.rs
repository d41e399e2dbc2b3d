use std::collections::HashMap;

use zaoshop_core::{OrderId, PrincipalId, ProductId};
use zaoshop_catalog::Product;

use crate::error::StoreError;
use crate::order::{Order, OrderDraft};

/// Port: the authoritative stock and price ledger.
///
/// Implementations must make `try_decrement` a single atomic conditional
/// write: it succeeds (returns `true`) only if the current stock covers
/// `quantity`, and two racing decrements for the same last unit can never
/// both succeed.
pub trait ProductLedger: Send + Sync {
    /// Snapshot of the referenced products. Ids with no product are simply
    /// absent from the map.
    fn get_by_ids(&self, ids: &[ProductId]) -> Result<HashMap<ProductId, Product>, StoreError>;

    /// Conditionally decrement stock on behalf of `order_id`. `Ok(false)`
    /// means the condition `stock >= quantity` did not hold (or the
    /// product vanished).
    ///
    /// The order id lets durable backends record, atomically with the
    /// decrement itself, which lines of a pending order have been
    /// applied, so a crash mid-saga can be reconciled on restart.
    fn try_decrement(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, StoreError>;

    /// Compensation: return a previously applied decrement of `order_id`
    /// to the ledger (and clear any applied-line record).
    fn restock(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError>;
}

/// Port: persistence for order records.
///
/// Orders are inserted as *pending* and only become visible to queries
/// once marked committed. `delete` removes an uncommitted order during
/// compensation.
pub trait OrderRepository: Send + Sync {
    fn insert_pending(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    fn mark_committed(&self, id: OrderId) -> Result<(), StoreError>;

    fn delete(&self, id: OrderId) -> Result<(), StoreError>;

    /// Committed order by id.
    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Committed orders placed by one principal, newest first.
    fn for_principal(&self, principal_id: PrincipalId) -> Result<Vec<Order>, StoreError>;

    /// All committed orders, newest first.
    fn list_all(&self) -> Result<Vec<Order>, StoreError>;
}
