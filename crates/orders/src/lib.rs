//! `zaoshop-orders` — order placement domain.
//!
//! The placement flow is split into a pure validator (pricing and stock
//! checks against a snapshot) and an [`OrderService`] that drives the
//! commit against the storage ports. The storage ports are traits here;
//! implementations live in `zaoshop-storage`.

pub mod error;
pub mod order;
pub mod service;
pub mod store;
pub mod validator;

pub use error::{PlaceOrderError, RejectReason, StoreError};
pub use order::{LineItem, Order, OrderDraft, OrderLine};
pub use service::OrderService;
pub use store::{OrderRepository, ProductLedger};
pub use validator::{check_shape, validate, PricedOrder};
