//! Postgres-backed store.
//!
//! The stock invariant is enforced by the database itself: the conditional
//! decrement is a single guarded `UPDATE ... WHERE stock >= $2`, so two
//! racing orders for the last unit can never both succeed, and a `CHECK
//! (stock >= 0)` constraint backs it up.
//!
//! The port traits are synchronous while sqlx is async; trait methods
//! bridge via `tokio::runtime::Handle`, which works when called from a
//! blocking context inside a tokio runtime (the API wraps service calls in
//! `spawn_blocking`).
//!
//! Crash recovery: each stock decrement marks its order line `decremented`
//! in the same SQL transaction, so a process that dies mid-placement
//! leaves an exact record of which decrements were applied. On startup
//! [`PostgresStore::recover_pending_orders`] restocks those lines and
//! drops the leftover pending orders.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Row};
use tracing::{info, instrument};

use zaoshop_catalog::{NewProduct, Product, ProductPatch};
use zaoshop_core::{OrderId, PrincipalId, ProductId};
use zaoshop_orders::{
    LineItem, Order, OrderDraft, OrderRepository, ProductLedger, StoreError,
};

use crate::catalog_store::CatalogStore;

const STATUS_PENDING: &str = "pending";
const STATUS_COMMITTED: &str = "committed";

/// Postgres-backed implementation of all three ports.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect, make sure the schema exists, and reconcile any pending
    /// orders a previous process left behind.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        let recovered = store.recover_pending_orders().await?;
        if recovered > 0 {
            info!(orders = recovered, "recovered pending orders left by a previous run");
        }
        Ok(store)
    }

    /// Idempotent schema setup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                unit_price BIGINT NOT NULL,
                stock INTEGER NOT NULL CHECK (stock >= 0),
                category TEXT,
                image_url TEXT,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id UUID PRIMARY KEY,
                principal_id UUID NOT NULL,
                status TEXT NOT NULL,
                total BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS order_lines (
                order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
                product_id UUID NOT NULL,
                quantity INTEGER NOT NULL,
                unit_price_at_purchase BIGINT NOT NULL,
                decremented BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_by_ids_async(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Product>, StoreError> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, unit_price, stock, category, image_url, created_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_by_ids", e))?;

        let mut snapshot = HashMap::with_capacity(rows.len());
        for row in rows {
            let product = ProductRow::from_row(&row)
                .map_err(|e| StoreError::new(format!("failed to read product row: {e}")))?
                .into_product();
            snapshot.insert(product.id, product);
        }
        Ok(snapshot)
    }

    /// The guarded stock UPDATE and the applied-line marker commit
    /// together, so after a crash the `decremented` flags are an exact
    /// record of which decrements reached the ledger.
    #[instrument(skip(self), fields(order_id = %order_id, product_id = %product_id), err)]
    async fn try_decrement_async(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let result = sqlx::query(
            "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
        )
        .bind(product_id.as_uuid())
        .bind(quantity as i32)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("try_decrement", e))?;

        if result.rows_affected() != 1 {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE order_lines SET decremented = TRUE WHERE order_id = $1 AND product_id = $2",
        )
        .bind(order_id.as_uuid())
        .bind(product_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("mark_line_decremented", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(true)
    }

    #[instrument(skip(self), fields(order_id = %order_id, product_id = %product_id), err)]
    async fn restock_async(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("UPDATE products SET stock = stock + $2 WHERE id = $1")
            .bind(product_id.as_uuid())
            .bind(quantity as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("restock", e))?;

        sqlx::query(
            "UPDATE order_lines SET decremented = FALSE WHERE order_id = $1 AND product_id = $2",
        )
        .bind(order_id.as_uuid())
        .bind(product_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("clear_line_decremented", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(())
    }

    /// Reconcile orders stranded mid-placement by a crash: restock every
    /// line whose decrement reached the ledger, then drop the pending
    /// orders. One transaction, so a crash during recovery just reruns it
    /// on the next start. Returns the number of orders removed.
    #[instrument(skip(self), err)]
    pub async fn recover_pending_orders(&self) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            UPDATE products p
            SET stock = p.stock + l.qty
            FROM (
                SELECT ol.product_id, SUM(ol.quantity)::INTEGER AS qty
                FROM order_lines ol
                JOIN orders o ON o.id = ol.order_id
                WHERE o.status = $1 AND ol.decremented
                GROUP BY ol.product_id
            ) l
            WHERE p.id = l.product_id
            "#,
        )
        .bind(STATUS_PENDING)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("restock_pending_lines", e))?;

        let deleted = sqlx::query("DELETE FROM orders WHERE status = $1")
            .bind(STATUS_PENDING)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_pending_orders", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(deleted.rows_affected())
    }

    /// Insert the order row and its lines atomically, status pending.
    #[instrument(skip(self, draft), fields(principal_id = %draft.principal_id), err)]
    async fn insert_pending_async(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let order = Order {
            id: OrderId::new(),
            principal_id: draft.principal_id,
            created_at: Utc::now(),
            lines: draft.lines,
            total: draft.total,
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, principal_id, status, total, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.principal_id.as_uuid())
        .bind(STATUS_PENDING)
        .bind(money_to_db(order.total, "order total")?)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, product_id, quantity, unit_price_at_purchase)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(line.product_id.as_uuid())
            .bind(line.quantity as i32)
            .bind(money_to_db(line.unit_price_at_purchase, "line unit price")?)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_line", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn mark_committed_async(&self, id: OrderId) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(STATUS_COMMITTED)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("mark_committed", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::new(format!("order {id} not found")));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn delete_async(&self, id: OrderId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_order", e))?;
        Ok(())
    }

    async fn load_lines(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<LineItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity, unit_price_at_purchase
            FROM order_lines
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_lines", e))?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let line = LineRow::from_row(&row)
                .map_err(|e| StoreError::new(format!("failed to read order line row: {e}")))?;
            lines.push(line.into_line_item());
        }
        Ok(lines)
    }

    async fn hydrate_orders(&self, rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<Order>, StoreError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let header = OrderRow::from_row(&row)
                .map_err(|e| StoreError::new(format!("failed to read order row: {e}")))?;
            let id = OrderId::from_uuid(header.id);
            let lines = self.load_lines(id).await?;
            orders.push(header.into_order(lines));
        }
        Ok(orders)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn get_async(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, principal_id, total, created_at
            FROM orders
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(STATUS_COMMITTED)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_order", e))?;

        match row {
            Some(row) => Ok(self.hydrate_orders(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(principal_id = %principal_id), err)]
    async fn for_principal_async(
        &self,
        principal_id: PrincipalId,
    ) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, principal_id, total, created_at
            FROM orders
            WHERE principal_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(principal_id.as_uuid())
        .bind(STATUS_COMMITTED)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("orders_for_principal", e))?;

        self.hydrate_orders(rows).await
    }

    #[instrument(skip(self), err)]
    async fn list_all_async(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, principal_id, total, created_at
            FROM orders
            WHERE status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(STATUS_COMMITTED)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders", e))?;

        self.hydrate_orders(rows).await
    }

    #[instrument(skip(self, new), err)]
    async fn insert_product_async(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product::from_new(new, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, unit_price, stock, category, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(money_to_db(product.unit_price, "unit price")?)
        .bind(product.stock as i32)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product_async(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, unit_price, stock, category, image_url, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        match row {
            Some(row) => {
                let product = ProductRow::from_row(&row)
                    .map_err(|e| StoreError::new(format!("failed to read product row: {e}")))?
                    .into_product();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list_products_async(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, unit_price, stock, category, image_url, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let product = ProductRow::from_row(&row)
                .map_err(|e| StoreError::new(format!("failed to read product row: {e}")))?
                .into_product();
            products.push(product);
        }
        Ok(products)
    }

    /// Read-modify-write under `FOR UPDATE` so concurrent patches do not
    /// clobber each other.
    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    async fn update_product_async(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = sqlx::query(
            r#"
            SELECT id, name, description, unit_price, stock, category, image_url, created_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("lock_product", e))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Ok(None);
        };

        let mut product = ProductRow::from_row(&row)
            .map_err(|e| StoreError::new(format!("failed to read product row: {e}")))?
            .into_product();
        patch.apply_to(&mut product);

        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, unit_price = $4, stock = $5, category = $6, image_url = $7
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(money_to_db(product.unit_price, "unit price")?)
        .bind(product.stock as i32)
        .bind(&product.category)
        .bind(&product.image_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(Some(product))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product_async(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        Ok(result.rows_affected() == 1)
    }
}

/// Run an async store operation from a sync trait method.
///
/// Requires a tokio runtime on the current thread's context; callers in
/// the API layer invoke the ports from `spawn_blocking`.
fn block_on<F, T>(future: F) -> Result<T, StoreError>
where
    F: std::future::Future<Output = Result<T, StoreError>>,
{
    let handle = tokio::runtime::Handle::try_current().map_err(|_| {
        StoreError::new(
            "PostgresStore requires an async runtime (tokio); call from within a tokio runtime context",
        )
    })?;
    handle.block_on(future)
}

impl ProductLedger for PostgresStore {
    fn get_by_ids(&self, ids: &[ProductId]) -> Result<HashMap<ProductId, Product>, StoreError> {
        block_on(self.get_by_ids_async(ids))
    }

    fn try_decrement(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, StoreError> {
        block_on(self.try_decrement_async(order_id, product_id, quantity))
    }

    fn restock(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        block_on(self.restock_async(order_id, product_id, quantity))
    }
}

impl OrderRepository for PostgresStore {
    fn insert_pending(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        block_on(self.insert_pending_async(draft))
    }

    fn mark_committed(&self, id: OrderId) -> Result<(), StoreError> {
        block_on(self.mark_committed_async(id))
    }

    fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        block_on(self.delete_async(id))
    }

    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        block_on(self.get_async(id))
    }

    fn for_principal(&self, principal_id: PrincipalId) -> Result<Vec<Order>, StoreError> {
        block_on(self.for_principal_async(principal_id))
    }

    fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        block_on(self.list_all_async())
    }
}

impl CatalogStore for PostgresStore {
    fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        block_on(self.insert_product_async(new))
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        block_on(self.get_product_async(id))
    }

    fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        block_on(self.list_products_async())
    }

    fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        block_on(self.update_product_async(id, patch))
    }

    fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        block_on(self.delete_product_async(id))
    }
}

/// Money columns are BIGINT; a u64 amount above `i64::MAX` cannot be
/// stored and must fail loudly instead of wrapping.
fn money_to_db(value: u64, field: &str) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::new(format!("{field} {value} exceeds the storable range")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::new(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::new(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::new(format!("sqlx error in {operation}: {err}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: uuid::Uuid,
    name: String,
    description: Option<String>,
    unit_price: i64,
    stock: i32,
    category: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            unit_price: row.try_get("unit_price")?,
            stock: row.try_get("stock")?,
            category: row.try_get("category")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            unit_price: self.unit_price as u64,
            stock: self.stock as u32,
            category: self.category,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug)]
struct OrderRow {
    id: uuid::Uuid,
    principal_id: uuid::Uuid,
    total: i64,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            principal_id: row.try_get("principal_id")?,
            total: row.try_get("total")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl OrderRow {
    fn into_order(self, lines: Vec<LineItem>) -> Order {
        Order {
            id: OrderId::from_uuid(self.id),
            principal_id: PrincipalId::from_uuid(self.principal_id),
            created_at: self.created_at,
            lines,
            total: self.total as u64,
        }
    }
}

#[derive(Debug)]
struct LineRow {
    product_id: uuid::Uuid,
    quantity: i32,
    unit_price_at_purchase: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for LineRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(LineRow {
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            unit_price_at_purchase: row.try_get("unit_price_at_purchase")?,
        })
    }
}

impl LineRow {
    fn into_line_item(self) -> LineItem {
        LineItem {
            product_id: ProductId::from_uuid(self.product_id),
            quantity: self.quantity as u32,
            unit_price_at_purchase: self.unit_price_at_purchase as u64,
        }
    }
}
