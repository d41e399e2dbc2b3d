//! Placement semantics exercised end to end against the in-memory store.

use std::sync::Arc;
use std::thread;

use zaoshop_catalog::NewProduct;
use zaoshop_core::PrincipalId;
use zaoshop_orders::{OrderLine, OrderRepository, OrderService, PlaceOrderError, RejectReason};

use crate::catalog_store::CatalogStore;
use crate::in_memory::InMemoryStore;

fn service(store: &Arc<InMemoryStore>) -> OrderService<InMemoryStore, InMemoryStore> {
    OrderService::new(Arc::clone(store), Arc::clone(store))
}

fn seed(store: &InMemoryStore, unit_price: u64, stock: u32) -> zaoshop_catalog::Product {
    store
        .insert_product(NewProduct {
            name: "Widget".to_string(),
            description: None,
            unit_price,
            stock,
            category: None,
            image_url: None,
        })
        .unwrap()
}

#[test]
fn committed_order_decrements_stock_and_is_queryable() {
    let store = Arc::new(InMemoryStore::new());
    let product = seed(&store, 500, 5);
    let svc = service(&store);
    let principal = PrincipalId::new();

    let order = svc
        .place_order(principal, &[OrderLine { product_id: product.id, quantity: 3 }])
        .unwrap();

    assert_eq!(order.total, 1500);
    assert_eq!(store.get_product(product.id).unwrap().unwrap().stock, 2);

    let mine = svc.orders_for(principal).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, order.id);
    assert_eq!(mine[0].lines[0].unit_price_at_purchase, 500);
}

#[test]
fn rejected_order_leaves_stock_and_orders_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let product = seed(&store, 500, 2);
    let svc = service(&store);

    let err = svc
        .place_order(
            PrincipalId::new(),
            &[OrderLine { product_id: product.id, quantity: 3 }],
        )
        .unwrap_err();

    assert!(matches!(
        err,
        PlaceOrderError::Rejected(RejectReason::InsufficientStock { .. })
    ));
    assert_eq!(store.get_product(product.id).unwrap().unwrap().stock, 2);
    assert!(svc.all_orders().unwrap().is_empty());
}

#[test]
fn one_bad_line_fails_the_whole_batch() {
    let store = Arc::new(InMemoryStore::new());
    let good = seed(&store, 100, 10);
    let scarce = seed(&store, 100, 1);
    let svc = service(&store);

    let err = svc
        .place_order(
            PrincipalId::new(),
            &[
                OrderLine { product_id: good.id, quantity: 2 },
                OrderLine { product_id: scarce.id, quantity: 5 },
            ],
        )
        .unwrap_err();

    assert!(matches!(err, PlaceOrderError::Rejected(_)));
    // Neither line was applied.
    assert_eq!(store.get_product(good.id).unwrap().unwrap().stock, 10);
    assert_eq!(store.get_product(scarce.id).unwrap().unwrap().stock, 1);
}

#[test]
fn concurrent_orders_for_the_last_unit_commit_exactly_once() {
    let store = Arc::new(InMemoryStore::new());
    let product = seed(&store, 999, 1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let svc = service(&store);
                svc.place_order(
                    PrincipalId::new(),
                    &[OrderLine { product_id: product.id, quantity: 1 }],
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let commits = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(commits, 1);
    for failure in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(
            failure,
            PlaceOrderError::Rejected(RejectReason::InsufficientStock { .. })
                | PlaceOrderError::Conflict(_)
        ));
    }

    assert_eq!(store.get_product(product.id).unwrap().unwrap().stock, 0);
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn concurrent_mixed_orders_never_oversell() {
    let store = Arc::new(InMemoryStore::new());
    let product = seed(&store, 100, 10);

    let handles: Vec<_> = (0u32..12)
        .map(|i| {
            let store = Arc::clone(&store);
            let quantity = (i % 3) + 1;
            thread::spawn(move || {
                let svc = service(&store);
                svc.place_order(
                    PrincipalId::new(),
                    &[OrderLine { product_id: product.id, quantity }],
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let sold: u64 = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|o| u64::from(o.lines[0].quantity))
        .sum();
    let remaining = store.get_product(product.id).unwrap().unwrap().stock;

    assert!(sold <= 10);
    assert_eq!(u64::from(remaining) + sold, 10);
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 200,
            ..ProptestConfig::default()
        })]

        /// Property: over any sequence of placement attempts, units sold
        /// plus units remaining always equals the initial stock, and stock
        /// never goes negative (it cannot, it is unsigned; the check is
        /// that no attempt commits beyond what was available).
        #[test]
        fn sold_plus_remaining_equals_initial_stock(
            initial_stock in 0u32..50,
            quantities in proptest::collection::vec(0u32..20, 1..20),
        ) {
            let store = Arc::new(InMemoryStore::new());
            let product = seed(&store, 10, initial_stock);
            let svc = service(&store);

            let mut sold: u64 = 0;
            for quantity in quantities {
                let result = svc.place_order(
                    PrincipalId::new(),
                    &[OrderLine { product_id: product.id, quantity }],
                );
                if let Ok(order) = result {
                    sold += u64::from(order.lines[0].quantity);
                }
            }

            let remaining = store.get_product(product.id).unwrap().unwrap().stock;
            prop_assert_eq!(sold + u64::from(remaining), u64::from(initial_stock));
        }

        /// Property: every committed order's total equals the sum of its
        /// line subtotals at the captured prices.
        #[test]
        fn committed_totals_match_line_subtotals(
            unit_price in 1u64..10_000,
            stock in 1u32..100,
        ) {
            let store = Arc::new(InMemoryStore::new());
            let product = seed(&store, unit_price, stock);
            let svc = service(&store);

            let order = svc
                .place_order(
                    PrincipalId::new(),
                    &[OrderLine { product_id: product.id, quantity: stock }],
                )
                .unwrap();

            let expected: u64 = order
                .lines
                .iter()
                .map(|l| u64::from(l.quantity) * l.unit_price_at_purchase)
                .sum();
            prop_assert_eq!(order.total, expected);
        }
    }
}
