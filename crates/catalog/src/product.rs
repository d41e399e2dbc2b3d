use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zaoshop_core::{DomainError, ProductId};

const NAME_MAX_LEN: usize = 200;
const DESCRIPTION_MAX_LEN: usize = 1000;
const CATEGORY_MAX_LEN: usize = 100;

/// Catalog record for a sellable product.
///
/// `unit_price` is in the smallest currency unit (e.g., cents). `stock` is
/// unsigned on purpose: the ledger only ever applies *conditional*
/// decrements, so the on-hand quantity can never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: u64,
    pub stock: u32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build a fresh record from validated admin input.
    pub fn from_new(new: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            name: new.name,
            description: new.description,
            unit_price: new.unit_price,
            stock: new.stock,
            category: new.category,
            image_url: new.image_url,
            created_at,
        }
    }
}

/// Admin input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: u64,
    pub stock: u32,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_optional_text(self.description.as_deref(), "description", DESCRIPTION_MAX_LEN)?;
        validate_optional_text(self.category.as_deref(), "category", CATEGORY_MAX_LEN)?;
        Ok(())
    }
}

/// Admin input for a partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<u64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_optional_text(self.description.as_deref(), "description", DESCRIPTION_MAX_LEN)?;
        validate_optional_text(self.category.as_deref(), "category", CATEGORY_MAX_LEN)?;
        Ok(())
    }

    /// Apply the patch to an existing record.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(unit_price) = self.unit_price {
            product.unit_price = unit_price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(image_url) = self.image_url {
            product.image_url = Some(image_url);
        }
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(DomainError::validation(format!(
            "name exceeds {NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), DomainError> {
    if let Some(value) = value {
        if value.chars().count() > max_len {
            return Err(DomainError::validation(format!(
                "{field} exceeds {max_len} characters"
            )));
        }
    }
    Ok(())
}
