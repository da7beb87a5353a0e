//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::document::{datetime_to_bson, decimal_to_bson, ProductDocument};
use crate::error::{ProductError, ProductResult};
use crate::models::{now_millis, PriceRange, Product, UpdateProduct};
use crate::repository::ProductRepository;

pub const COLLECTION_NAME: &str = "products";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    /// Unique index on `id` and an ascending index on `price` for range queries.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = %self.collection.name(), "Product indexes created");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<ProductDocument> {
        &self.collection
    }

    /// `{}` or `{price: {$gt: min, $lt: max}}` with only the bounds that are set.
    pub(crate) fn build_filter(range: &PriceRange) -> ProductResult<Document> {
        let mut price = doc! {};

        if let Some(min) = range.price_min {
            price.insert("$gt", decimal_to_bson(min)?);
        }
        if let Some(max) = range.price_max {
            price.insert("$lt", decimal_to_bson(max)?);
        }

        if price.is_empty() {
            Ok(doc! {})
        } else {
            Ok(doc! { "price": price })
        }
    }

    /// `{$set: {...present fields}, $max: {updated_at: now}}`.
    ///
    /// `updated_at` never moves backwards, so it stays at or after `created_at`.
    pub(crate) fn build_update(update: &UpdateProduct, now: DateTime<Utc>) -> ProductResult<Document> {
        let mut set = doc! {};

        if let Some(ref name) = update.name {
            set.insert("name", name);
        }
        if let Some(quantity) = update.quantity {
            set.insert("quantity", quantity);
        }
        if let Some(price) = update.price {
            set.insert("price", decimal_to_bson(price)?);
        }
        if let Some(status) = update.status {
            set.insert("status", status);
        }

        let mut changes = doc! { "$max": { "updated_at": datetime_to_bson(now) } };
        if !set.is_empty() {
            changes.insert("$set", set);
        }

        Ok(changes)
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "id": id.to_string() }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        let document = ProductDocument::try_from(&product)?;

        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| ProductError::Insertion(e.to_string()))?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        self.collection
            .find_one(Self::id_filter(id))
            .await?
            .map(Product::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, range: PriceRange) -> ProductResult<Vec<Product>> {
        let filter = Self::build_filter(&range)?;

        let cursor = self.collection.find(filter).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        documents.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: UpdateProduct) -> ProductResult<Option<Product>> {
        let changes = Self::build_update(&update, now_millis())?;

        let updated = self
            .collection
            .find_one_and_update(Self::id_filter(id), changes)
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(document) => {
                tracing::info!(product_id = %id, "Product updated successfully");
                Product::try_from(document).map(Some)
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}
