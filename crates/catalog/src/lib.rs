//! `zaoshop-catalog` — product catalog records and boundary validation.

pub mod product;

pub use product::{NewProduct, Product, ProductPatch};
