use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

use crate::models::item::{Product, SelectableItem};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid product '{id}': {source}")]
    ValidationError {
        id: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Duplicate product id: {id}")]
    DuplicateId { id: String },
}

/// Products offered on the cart page, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        let products = [("1", "Product A", 150.0), ("2", "Product B", 250.0), ("3", "Product C", 100.0)]
            .into_iter()
            .map(|(id, name, price)| Product {
                id: id.to_string(),
                name: name.to_string(),
                price,
            })
            .collect();
        Self { products }
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            product
                .validate()
                .map_err(|source| CatalogError::ValidationError {
                    id: product.id.clone(),
                    source,
                })?;
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: product.id.clone(),
                });
            }
        }
        Ok(Self { products })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        debug!("Loading catalog from {}", path.display());
        let catalog = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            "Loaded {} product(s) from {}",
            catalog.products.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Loads `path` when given, otherwise falls back to the built-in products.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// One unchecked checkbox per product.
    pub fn items(&self) -> Vec<SelectableItem> {
        self.products.iter().map(SelectableItem::from).collect()
    }
}
