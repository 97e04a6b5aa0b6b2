//! Catalog seam - the external service supplying product definitions
//!
//! The core consumes the catalog as an abstract collaborator and only ever
//! stores snapshots taken through this seam. [`StaticCatalog`] is a fixed
//! in-memory implementation for tests and embedding; a real deployment puts
//! its menu service behind the same trait.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::error::{PosError, PosResult};
use shared::models::product::ProductSnapshot;

/// Read-only product lookup at cart-composition and submission time
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a point-in-time snapshot of a product
    async fn product(&self, product_id: &str) -> PosResult<ProductSnapshot>;
}

/// Fixed in-memory catalog
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: DashMap<String, ProductSnapshot>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: ProductSnapshot) {
        self.products.insert(product.id.clone(), product);
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn product(&self, product_id: &str) -> PosResult<ProductSnapshot> {
        self.products
            .get(product_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| PosError::ProductNotFound(product_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::money::{Currency, Money};

    #[tokio::test]
    async fn test_static_catalog_lookup() {
        let catalog = StaticCatalog::new();
        catalog.insert(ProductSnapshot {
            id: "prod-1".to_string(),
            name: "Burger".to_string(),
            unit_price: Money::new(2000, Currency::Brl),
            option_groups: Vec::new(),
        });

        let snapshot = catalog.product("prod-1").await.unwrap();
        assert_eq!(snapshot.name, "Burger");

        let result = catalog.product("ghost").await;
        assert!(matches!(result, Err(PosError::ProductNotFound(_))));
    }
}
