//! BSON shape of a product as stored in the `products` collection.
//!
//! The product id lives in its own `id` field as a hyphenated string; the
//! store-assigned `_id` is not part of the mapping and is ignored on read.
//! Prices are stored as `Decimal128` so range queries compare decimals.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, Decimal128};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ProductError;
use crate::models::Product;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: String,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal128,
    pub status: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

pub fn decimal_to_bson(value: Decimal) -> Result<Decimal128, ProductError> {
    Decimal128::from_str(&value.to_string())
        .map_err(|e| ProductError::Internal(format!("Cannot store price {value}: {e}")))
}

/// Accepts both plain (`8.500`) and scientific (`8.500E+0`) renderings.
pub fn decimal_from_bson(value: &Decimal128) -> Result<Decimal, ProductError> {
    let raw = value.to_string();
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| ProductError::Internal(format!("Cannot read stored price {raw}: {e}")))
}

pub(crate) fn datetime_to_bson(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

fn datetime_from_bson(value: bson::DateTime) -> Result<DateTime<Utc>, ProductError> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).ok_or_else(|| {
        ProductError::Internal(format!(
            "Stored timestamp out of range: {}",
            value.timestamp_millis()
        ))
    })
}

impl TryFrom<&Product> for ProductDocument {
    type Error = ProductError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            quantity: product.quantity,
            price: decimal_to_bson(product.price)?,
            status: product.status,
            created_at: datetime_to_bson(product.created_at),
            updated_at: datetime_to_bson(product.updated_at),
        })
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = ProductError;

    fn try_from(doc: ProductDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&doc.id)
            .map_err(|e| ProductError::Internal(format!("Stored id {} is not a UUID: {e}", doc.id)))?;

        Ok(Self {
            id,
            name: doc.name,
            quantity: doc.quantity,
            price: decimal_from_bson(&doc.price)?,
            status: doc.status,
            created_at: datetime_from_bson(doc.created_at)?,
            updated_at: datetime_from_bson(doc.updated_at)?,
        })
    }
}
