use std::sync::Arc;

use tracing::{error, info, warn};

use zaoshop_core::PrincipalId;

use crate::error::{PlaceOrderError, StoreError};
use crate::order::{Order, OrderDraft, OrderLine};
use crate::store::{OrderRepository, ProductLedger};
use crate::validator;

/// Drives the order placement transaction against the storage ports.
///
/// Placement is a short saga: snapshot, validate, insert pending, apply
/// conditional decrements, mark committed. Any commit-time failure
/// compensates (restocks applied decrements, deletes the pending order)
/// before returning, so a failed attempt leaves no trace.
pub struct OrderService<L, R> {
    ledger: Arc<L>,
    orders: Arc<R>,
}

impl<L, R> Clone for OrderService<L, R> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            orders: Arc::clone(&self.orders),
        }
    }
}

impl<L, R> OrderService<L, R>
where
    L: ProductLedger,
    R: OrderRepository,
{
    pub fn new(ledger: Arc<L>, orders: Arc<R>) -> Self {
        Self { ledger, orders }
    }

    pub fn place_order(
        &self,
        principal_id: PrincipalId,
        lines: &[OrderLine],
    ) -> Result<Order, PlaceOrderError> {
        // Shape problems need no catalog data and must not cause I/O.
        validator::check_shape(lines)?;

        // Shape check passed, so the ids are already distinct.
        let ids: Vec<_> = lines.iter().map(|l| l.product_id).collect();
        let snapshot = self.ledger.get_by_ids(&ids)?;

        let priced = validator::validate(lines, &snapshot)?;

        let order = self.orders.insert_pending(OrderDraft {
            principal_id,
            lines: priced.lines,
            total: priced.total,
        })?;

        // Conditional decrements, one line at a time. The validator already
        // approved these quantities against the snapshot, so a failure here
        // means a concurrent purchase won the race since then.
        let mut applied: Vec<OrderLine> = Vec::with_capacity(order.lines.len());
        for item in &order.lines {
            let line = OrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
            };
            match self
                .ledger
                .try_decrement(order.id, line.product_id, line.quantity)
            {
                Ok(true) => applied.push(line),
                Ok(false) => {
                    warn!(
                        order_id = %order.id,
                        product_id = %line.product_id,
                        "stock consumed concurrently, compensating"
                    );
                    self.compensate(&order, &applied);
                    return Err(PlaceOrderError::Conflict(line.product_id));
                }
                Err(err) => {
                    self.compensate(&order, &applied);
                    return Err(PlaceOrderError::Storage(err));
                }
            }
        }

        if let Err(err) = self.orders.mark_committed(order.id) {
            self.compensate(&order, &applied);
            return Err(PlaceOrderError::Storage(err));
        }

        info!(
            order_id = %order.id,
            principal_id = %principal_id,
            total = order.total,
            lines = order.lines.len(),
            "order committed"
        );
        Ok(order)
    }

    /// Roll back a half-applied placement: restock every applied decrement
    /// and delete the pending order record. Best effort; failures are
    /// logged, the attempt still reports its original error.
    fn compensate(&self, order: &Order, applied: &[OrderLine]) {
        for line in applied {
            if let Err(err) = self.ledger.restock(order.id, line.product_id, line.quantity) {
                error!(
                    order_id = %order.id,
                    product_id = %line.product_id,
                    error = %err,
                    "failed to restock during compensation"
                );
            }
        }
        if let Err(err) = self.orders.delete(order.id) {
            error!(order_id = %order.id, error = %err, "failed to delete pending order");
        }
    }
}

// Convenience pass-throughs so callers holding the service do not need a
// second handle on the repository.
impl<L, R> OrderService<L, R>
where
    L: ProductLedger,
    R: OrderRepository,
{
    pub fn order(&self, id: zaoshop_core::OrderId) -> Result<Option<Order>, StoreError> {
        self.orders.get(id)
    }

    pub fn orders_for(&self, principal_id: PrincipalId) -> Result<Vec<Order>, StoreError> {
        self.orders.for_principal(principal_id)
    }

    pub fn all_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.orders.list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;
    use zaoshop_catalog::Product;
    use zaoshop_core::{OrderId, ProductId};

    use crate::error::RejectReason;

    /// Ledger fake that records every call and fails decrements on demand.
    struct ScriptedLedger {
        products: HashMap<ProductId, Product>,
        deny_decrement_for: Option<ProductId>,
        snapshot_calls: Mutex<usize>,
        decrements: Mutex<Vec<(OrderId, ProductId, u32)>>,
        restocks: Mutex<Vec<(OrderId, ProductId, u32)>>,
    }

    impl ScriptedLedger {
        fn new(products: Vec<Product>) -> Self {
            Self {
                products: products.into_iter().map(|p| (p.id, p)).collect(),
                deny_decrement_for: None,
                snapshot_calls: Mutex::new(0),
                decrements: Mutex::new(Vec::new()),
                restocks: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProductLedger for ScriptedLedger {
        fn get_by_ids(
            &self,
            ids: &[ProductId],
        ) -> Result<HashMap<ProductId, Product>, StoreError> {
            *self.snapshot_calls.lock().unwrap() += 1;
            Ok(ids
                .iter()
                .filter_map(|id| self.products.get(id).cloned().map(|p| (*id, p)))
                .collect())
        }

        fn try_decrement(
            &self,
            order_id: OrderId,
            product_id: ProductId,
            quantity: u32,
        ) -> Result<bool, StoreError> {
            if self.deny_decrement_for == Some(product_id) {
                return Ok(false);
            }
            self.decrements
                .lock()
                .unwrap()
                .push((order_id, product_id, quantity));
            Ok(true)
        }

        fn restock(
            &self,
            order_id: OrderId,
            product_id: ProductId,
            quantity: u32,
        ) -> Result<(), StoreError> {
            self.restocks
                .lock()
                .unwrap()
                .push((order_id, product_id, quantity));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingRepo {
        inserted: Mutex<Vec<Order>>,
        committed: Mutex<Vec<OrderId>>,
        deleted: Mutex<Vec<OrderId>>,
    }

    impl OrderRepository for RecordingRepo {
        fn insert_pending(&self, draft: OrderDraft) -> Result<Order, StoreError> {
            let order = Order {
                id: OrderId::new(),
                principal_id: draft.principal_id,
                created_at: Utc::now(),
                lines: draft.lines,
                total: draft.total,
            };
            self.inserted.lock().unwrap().push(order.clone());
            Ok(order)
        }

        fn mark_committed(&self, id: OrderId) -> Result<(), StoreError> {
            self.committed.lock().unwrap().push(id);
            Ok(())
        }

        fn delete(&self, id: OrderId) -> Result<(), StoreError> {
            self.deleted.lock().unwrap().push(id);
            Ok(())
        }

        fn get(&self, _id: OrderId) -> Result<Option<Order>, StoreError> {
            Ok(None)
        }

        fn for_principal(&self, _principal_id: PrincipalId) -> Result<Vec<Order>, StoreError> {
            Ok(Vec::new())
        }

        fn list_all(&self) -> Result<Vec<Order>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn product(unit_price: u64, stock: u32) -> Product {
        Product {
            id: ProductId::new(),
            name: "Widget".to_string(),
            description: None,
            unit_price,
            stock,
            category: None,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn happy_path_decrements_commits_and_prices_from_ledger() {
        let a = product(500, 5);
        let ledger = Arc::new(ScriptedLedger::new(vec![a.clone()]));
        let repo = Arc::new(RecordingRepo::default());
        let service = OrderService::new(Arc::clone(&ledger), Arc::clone(&repo));

        let order = service
            .place_order(
                PrincipalId::new(),
                &[OrderLine { product_id: a.id, quantity: 3 }],
            )
            .unwrap();

        assert_eq!(order.total, 1500);
        assert_eq!(*ledger.decrements.lock().unwrap(), vec![(order.id, a.id, 3)]);
        assert_eq!(*repo.committed.lock().unwrap(), vec![order.id]);
        assert!(repo.deleted.lock().unwrap().is_empty());
        assert!(ledger.restocks.lock().unwrap().is_empty());
    }

    #[test]
    fn malformed_request_is_rejected_before_any_ledger_read() {
        let a = product(500, 5);
        let ledger = Arc::new(ScriptedLedger::new(vec![a.clone()]));
        let repo = Arc::new(RecordingRepo::default());
        let service = OrderService::new(Arc::clone(&ledger), Arc::clone(&repo));

        let err = service.place_order(PrincipalId::new(), &[]).unwrap_err();
        assert!(matches!(
            err,
            PlaceOrderError::Rejected(RejectReason::MalformedRequest(_))
        ));

        let err = service
            .place_order(
                PrincipalId::new(),
                &[
                    OrderLine { product_id: a.id, quantity: 1 },
                    OrderLine { product_id: a.id, quantity: 2 },
                ],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PlaceOrderError::Rejected(RejectReason::MalformedRequest(_))
        ));

        // Neither attempt read the ledger or touched the repository.
        assert_eq!(*ledger.snapshot_calls.lock().unwrap(), 0);
        assert!(ledger.decrements.lock().unwrap().is_empty());
        assert!(repo.inserted.lock().unwrap().is_empty());
    }

    #[test]
    fn rejection_touches_no_port_state() {
        let a = product(500, 2);
        let ledger = Arc::new(ScriptedLedger::new(vec![a.clone()]));
        let repo = Arc::new(RecordingRepo::default());
        let service = OrderService::new(Arc::clone(&ledger), Arc::clone(&repo));

        let err = service
            .place_order(
                PrincipalId::new(),
                &[OrderLine { product_id: a.id, quantity: 3 }],
            )
            .unwrap_err();

        assert_eq!(
            err,
            PlaceOrderError::Rejected(RejectReason::InsufficientStock {
                product_id: a.id,
                requested: 3,
                available: 2,
            })
        );
        assert!(ledger.decrements.lock().unwrap().is_empty());
        assert!(repo.inserted.lock().unwrap().is_empty());
    }

    #[test]
    fn lost_race_compensates_applied_decrements_and_deletes_pending_order() {
        let a = product(100, 5);
        let b = product(200, 5);
        let mut ledger = ScriptedLedger::new(vec![a.clone(), b.clone()]);
        ledger.deny_decrement_for = Some(b.id);
        let ledger = Arc::new(ledger);
        let repo = Arc::new(RecordingRepo::default());
        let service = OrderService::new(Arc::clone(&ledger), Arc::clone(&repo));

        let err = service
            .place_order(
                PrincipalId::new(),
                &[
                    OrderLine { product_id: a.id, quantity: 2 },
                    OrderLine { product_id: b.id, quantity: 1 },
                ],
            )
            .unwrap_err();

        assert_eq!(err, PlaceOrderError::Conflict(b.id));
        let inserted = repo.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        let pending_id = inserted[0].id;
        // The decrement already applied to `a` was returned, tagged with
        // the pending order it was applied for.
        assert_eq!(*ledger.restocks.lock().unwrap(), vec![(pending_id, a.id, 2)]);
        assert_eq!(*ledger.decrements.lock().unwrap(), vec![(pending_id, a.id, 2)]);
        // The pending record was removed, nothing was committed.
        assert_eq!(*repo.deleted.lock().unwrap(), vec![pending_id]);
        assert!(repo.committed.lock().unwrap().is_empty());
    }
}
