use thiserror::Error;

use zaoshop_core::ProductId;

/// Why an order request was rejected before any state changed.
///
/// Rejection is all-or-nothing: one bad line fails the whole batch and the
/// ledger is untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

/// Infrastructure failure reported by a storage port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("storage failure: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Terminal outcome of a failed placement attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaceOrderError {
    /// The request itself was invalid against the current catalog.
    #[error(transparent)]
    Rejected(#[from] RejectReason),

    /// A concurrent purchase consumed the stock between validation and
    /// commit. All partial effects were compensated; safe to retry.
    #[error("order aborted by concurrent stock change on product {0}")]
    Conflict(ProductId),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
