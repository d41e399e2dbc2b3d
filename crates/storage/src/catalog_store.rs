use zaoshop_catalog::{NewProduct, Product, ProductPatch};
use zaoshop_core::ProductId;
use zaoshop_orders::StoreError;

/// Port: admin CRUD on the product catalog.
///
/// Input validation (field limits, non-empty name) happens at the API
/// boundary; stores only persist.
pub trait CatalogStore: Send + Sync {
    fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError>;

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// All products, newest first.
    fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Partial update. `Ok(None)` if the product does not exist.
    fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError>;

    /// `Ok(false)` if the product did not exist.
    fn delete_product(&self, id: ProductId) -> Result<bool, StoreError>;
}
