//! Store selection and service wiring.
//!
//! `USE_PERSISTENT_STORE=true` (plus `DATABASE_URL`) selects the Postgres
//! backend; the default is the in-memory store. All service methods are
//! synchronous; handlers invoke them through `spawn_blocking` so the
//! Postgres bridge's `Handle::block_on` never runs on an async worker.

use std::sync::Arc;

use zaoshop_catalog::{NewProduct, Product, ProductPatch};
use zaoshop_core::{PrincipalId, ProductId};
use zaoshop_orders::{Order, OrderLine, OrderService, PlaceOrderError, StoreError};
use zaoshop_storage::{CatalogStore, InMemoryStore, PostgresStore};

#[derive(Clone)]
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryStore>,
        orders: OrderService<InMemoryStore, InMemoryStore>,
    },
    Persistent {
        store: Arc<PostgresStore>,
        orders: OrderService<PostgresStore, PostgresStore>,
    },
}

impl AppServices {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let orders = OrderService::new(Arc::clone(&store), Arc::clone(&store));
        Self::InMemory { store, orders }
    }

    fn persistent(store: PostgresStore) -> Self {
        let store = Arc::new(store);
        let orders = OrderService::new(Arc::clone(&store), Arc::clone(&store));
        Self::Persistent { store, orders }
    }

    pub fn place_order(
        &self,
        principal_id: PrincipalId,
        lines: &[OrderLine],
    ) -> Result<Order, PlaceOrderError> {
        match self {
            Self::InMemory { orders, .. } => orders.place_order(principal_id, lines),
            Self::Persistent { orders, .. } => orders.place_order(principal_id, lines),
        }
    }

    pub fn orders_for(&self, principal_id: PrincipalId) -> Result<Vec<Order>, StoreError> {
        match self {
            Self::InMemory { orders, .. } => orders.orders_for(principal_id),
            Self::Persistent { orders, .. } => orders.orders_for(principal_id),
        }
    }

    pub fn all_orders(&self) -> Result<Vec<Order>, StoreError> {
        match self {
            Self::InMemory { orders, .. } => orders.all_orders(),
            Self::Persistent { orders, .. } => orders.all_orders(),
        }
    }

    pub fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.insert_product(new),
            Self::Persistent { store, .. } => store.insert_product(new),
        }
    }

    pub fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.get_product(id),
            Self::Persistent { store, .. } => store.get_product(id),
        }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.list_products(),
            Self::Persistent { store, .. } => store.list_products(),
        }
    }

    pub fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.update_product(id, patch),
            Self::Persistent { store, .. } => store.update_product(id, patch),
        }
    }

    pub fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.delete_product(id),
            Self::Persistent { store, .. } => store.delete_product(id),
        }
    }

    /// Insert a small demo catalog (dev convenience, `SEED_DEMO_CATALOG`).
    pub fn seed_demo_catalog(&self) -> Result<usize, StoreError> {
        let demo = demo_catalog();
        let count = demo.len();
        for new in demo {
            self.insert_product(new)?;
        }
        Ok(count)
    }
}

pub async fn build_services() -> AppServices {
    if env_flag("USE_PERSISTENT_STORE") {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| panic!("USE_PERSISTENT_STORE is set but DATABASE_URL is not"));
        let store = PostgresStore::connect(&database_url)
            .await
            .unwrap_or_else(|e| panic!("failed to connect to postgres: {e}"));
        tracing::info!("using persistent store");
        AppServices::persistent(store)
    } else {
        tracing::info!("using in-memory store");
        AppServices::in_memory()
    }
}

pub async fn seed_demo_catalog_if_requested(services: &Arc<AppServices>) {
    if !env_flag("SEED_DEMO_CATALOG") {
        return;
    }

    let services = Arc::clone(services);
    let seeded = tokio::task::spawn_blocking(move || services.seed_demo_catalog()).await;
    match seeded {
        Ok(Ok(count)) => tracing::info!(count, "seeded demo catalog"),
        Ok(Err(e)) => tracing::error!(error = %e, "failed to seed demo catalog"),
        Err(e) => tracing::error!(error = %e, "demo catalog seeding task failed"),
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| {
            let v = v.to_lowercase();
            v == "1" || v == "true" || v == "yes"
        })
        .unwrap_or(false)
}

fn demo_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Laptop Pro 14".to_string(),
            description: Some("14-inch laptop, 16 GB RAM, 512 GB SSD".to_string()),
            unit_price: 129_900,
            stock: 10,
            category: Some("electronics".to_string()),
            image_url: None,
        },
        NewProduct {
            name: "Wireless Mouse".to_string(),
            description: Some("Ergonomic wireless mouse".to_string()),
            unit_price: 2_499,
            stock: 50,
            category: Some("electronics".to_string()),
            image_url: None,
        },
        NewProduct {
            name: "Mechanical Keyboard".to_string(),
            description: Some("Tenkeyless, brown switches".to_string()),
            unit_price: 8_999,
            stock: 25,
            category: Some("electronics".to_string()),
            image_url: None,
        },
        NewProduct {
            name: "USB-C Hub".to_string(),
            description: Some("7-in-1 hub with HDMI and card reader".to_string()),
            unit_price: 3_499,
            stock: 40,
            category: Some("accessories".to_string()),
            image_url: None,
        },
        NewProduct {
            name: "Noise-Cancelling Headphones".to_string(),
            description: Some("Over-ear, 30h battery".to_string()),
            unit_price: 19_999,
            stock: 15,
            category: Some("audio".to_string()),
            image_url: None,
        },
    ]
}
