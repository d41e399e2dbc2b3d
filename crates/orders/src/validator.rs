use std::collections::{HashMap, HashSet};

use zaoshop_catalog::Product;
use zaoshop_core::ProductId;

use crate::error::RejectReason;
use crate::order::{LineItem, OrderLine};

/// Output of successful validation: priced lines plus the checked total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub lines: Vec<LineItem>,
    pub total: u64,
}

/// Structural checks that need no catalog data: non-empty line list,
/// every quantity >= 1, no duplicate product ids.
///
/// Callers run this before touching any store, so a malformed request
/// never causes I/O.
pub fn check_shape(lines: &[OrderLine]) -> Result<(), RejectReason> {
    if lines.is_empty() {
        return Err(RejectReason::MalformedRequest(
            "order must contain at least one line".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if line.quantity == 0 {
            return Err(RejectReason::MalformedRequest(format!(
                "quantity for product {} must be at least 1",
                line.product_id
            )));
        }
        if !seen.insert(line.product_id) {
            return Err(RejectReason::MalformedRequest(format!(
                "duplicate product {} in order",
                line.product_id
            )));
        }
    }

    Ok(())
}

/// Price and stock-check an order against a catalog snapshot.
///
/// Pure function: same lines + same snapshot always produce the same
/// result, and nothing is mutated. Failure is whole-batch; callers must
/// not apply any effect from a rejected request.
///
/// Checks, in order:
/// 1. shape (see [`check_shape`])
/// 2. every referenced product exists in the snapshot
/// 3. every quantity <= snapshot stock
/// 4. total = Σ quantity × unit_price with checked arithmetic
pub fn validate(
    lines: &[OrderLine],
    snapshot: &HashMap<ProductId, Product>,
) -> Result<PricedOrder, RejectReason> {
    check_shape(lines)?;

    let mut priced = Vec::with_capacity(lines.len());
    let mut total: u64 = 0;
    for line in lines {
        let product = snapshot
            .get(&line.product_id)
            .ok_or(RejectReason::UnknownProduct(line.product_id))?;

        if line.quantity > product.stock {
            return Err(RejectReason::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity,
                available: product.stock,
            });
        }

        let item = LineItem {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price_at_purchase: product.unit_price,
        };
        let subtotal = item.subtotal().ok_or_else(|| {
            RejectReason::MalformedRequest(format!(
                "order total overflows on product {}",
                line.product_id
            ))
        })?;
        total = total.checked_add(subtotal).ok_or_else(|| {
            RejectReason::MalformedRequest("order total overflows".to_string())
        })?;

        priced.push(item);
    }

    Ok(PricedOrder { lines: priced, total })
}
