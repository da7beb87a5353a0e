use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{PriceRange, Product, UpdateProduct};

/// Repository trait for Product persistence
///
/// Implementations own the mapping to their storage backend. The service
/// layer builds entities and interprets `None`/`false` as not-found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a fully built product
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// List products priced strictly inside `range`
    async fn list(&self, range: PriceRange) -> ProductResult<Vec<Product>>;

    /// Apply the present fields atomically, returning the updated product
    async fn update(&self, id: Uuid, update: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}
