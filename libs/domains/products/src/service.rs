//! Product Service - Business logic layer

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, PriceRange, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product use-cases over an injected repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product with a generated id and timestamps
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.insert(Product::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Products priced strictly inside `range`; an open range returns everything
    #[instrument(skip(self))]
    pub async fn query_products(&self, range: PriceRange) -> ProductResult<Vec<Product>> {
        self.repository.list(range).await
    }

    #[instrument(skip(self))]
    pub async fn query_products_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        self.query_products(PriceRange::between(min, max)).await
    }

    /// Apply the present fields of `input`; `updated_at` always moves forward
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Delete a product, failing with `NotFound` when it does not exist
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<bool> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        self.repository.delete(id).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
