use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zaoshop_core::{OrderId, PrincipalId, ProductId};

/// One requested line of an order, as submitted by the shopper.
///
/// Ephemeral request input: it carries no price. Prices always come from
/// the ledger snapshot at validation time, never from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A priced line of a committed order.
///
/// `unit_price_at_purchase` is the catalog price captured when the order
/// was validated. Later catalog edits do not retroactively change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price_at_purchase: u64,
}

impl LineItem {
    /// Line subtotal. `None` on arithmetic overflow.
    pub fn subtotal(&self) -> Option<u64> {
        u64::from(self.quantity).checked_mul(self.unit_price_at_purchase)
    }
}

/// Validated order content awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub principal_id: PrincipalId,
    pub lines: Vec<LineItem>,
    pub total: u64,
}

/// A placed order. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub principal_id: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<LineItem>,
    pub total: u64,
}
