use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Product entity, also the API output shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Units in stock
    pub quantity: i32,
    /// Unit price as a fixed-point decimal string
    #[schema(value_type = String, example = "8.500")]
    pub price: Decimal,
    /// Whether the product is active
    pub status: bool,
    /// When the product was created
    pub created_at: DateTime<Utc>,
    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    /// Product name
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Units in stock
    #[validate(range(min = 0))]
    pub quantity: i32,
    /// Unit price
    #[schema(value_type = String, example = "8.500")]
    #[validate(custom(function = "non_negative_price"))]
    pub price: Decimal,
    /// Whether the product is active
    pub status: bool,
}

/// DTO for a partial update. Absent or `null` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "7.500")]
    #[validate(custom(function = "non_negative_price"))]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<bool>,
}

/// Optional exclusive price bounds for listing products
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRange {
    /// Only products priced strictly above this
    #[param(value_type = Option<String>, example = "5.00")]
    pub price_min: Option<Decimal>,
    /// Only products priced strictly below this
    #[param(value_type = Option<String>, example = "10.00")]
    pub price_max: Option<Decimal>,
}

/// Mandatory exclusive price bounds for `/filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BoundedPriceQuery {
    /// Lower bound, exclusive
    #[param(value_type = String, example = "5.00")]
    pub min_price: Decimal,
    /// Upper bound, exclusive
    #[param(value_type = String, example = "10.00")]
    pub max_price: Decimal,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Current time at the millisecond precision the store keeps.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl Product {
    /// Builds a new product with a fresh id and matching timestamps.
    pub fn new(input: CreateProduct) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            quantity: input.quantity,
            price: input.price,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the present fields of `update` and refreshes `updated_at`,
    /// which never moves backwards.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = self.updated_at.max(now_millis());
    }
}

impl UpdateProduct {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none() && self.status.is_none()
    }
}

impl PriceRange {
    pub fn between(min: Decimal, max: Decimal) -> Self {
        Self {
            price_min: Some(min),
            price_max: Some(max),
        }
    }

    /// Strict comparison against whichever bounds are set.
    pub fn contains(&self, price: Decimal) -> bool {
        self.price_min.is_none_or(|min| price > min) && self.price_max.is_none_or(|max| price < max)
    }
}

impl From<BoundedPriceQuery> for PriceRange {
    fn from(query: BoundedPriceQuery) -> Self {
        Self::between(query.min_price, query.max_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn create_input() -> CreateProduct {
        CreateProduct {
            name: "Iphone 14 pro Max".to_string(),
            quantity: 10,
            price: dec("8.500"),
            status: true,
        }
    }

    #[test]
    fn test_new_product_has_identity_and_matching_timestamps() {
        let product = Product::new(create_input());

        assert!(!product.id.is_nil());
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(product.name, "Iphone 14 pro Max");
        assert_eq!(product.price, dec("8.500"));
    }

    #[test]
    fn test_apply_update_changes_only_present_fields() {
        let mut product = Product::new(create_input());
        let before = product.clone();

        product.apply_update(UpdateProduct {
            price: Some(dec("7.500")),
            ..Default::default()
        });

        assert_eq!(product.price, dec("7.500"));
        assert_eq!(product.id, before.id);
        assert_eq!(product.name, before.name);
        assert_eq!(product.quantity, before.quantity);
        assert_eq!(product.status, before.status);
        assert_eq!(product.created_at, before.created_at);
        assert!(product.updated_at >= product.created_at);
    }

    #[test]
    fn test_apply_update_never_moves_updated_at_backwards() {
        let mut product = Product::new(create_input());
        let ahead = product.created_at + chrono::Duration::hours(1);
        product.created_at = ahead;
        product.updated_at = ahead;

        product.apply_update(UpdateProduct::default());

        assert_eq!(product.updated_at, ahead);
        assert!(product.updated_at >= product.created_at);
    }

    #[test]
    fn test_price_serializes_as_string_preserving_scale() {
        let product = Product::new(create_input());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["price"], "8.500");
        assert_eq!(json["quantity"], 10);
        assert_eq!(json["status"], true);
    }

    #[test]
    fn test_create_accepts_string_and_number_prices() {
        let from_string: CreateProduct = serde_json::from_str(
            r#"{"name":"a","quantity":1,"price":"8.500","status":true}"#,
        )
        .unwrap();
        assert_eq!(from_string.price.to_string(), "8.500");

        let from_number: CreateProduct =
            serde_json::from_str(r#"{"name":"a","quantity":1,"price":8.5,"status":true}"#).unwrap();
        assert_eq!(from_number.price, dec("8.5"));
    }

    #[test]
    fn test_create_validation() {
        assert!(create_input().validate().is_ok());

        let empty_name = CreateProduct {
            name: String::new(),
            ..create_input()
        };
        assert!(empty_name.validate().unwrap_err().field_errors().contains_key("name"));

        let negative_quantity = CreateProduct {
            quantity: -1,
            ..create_input()
        };
        assert!(negative_quantity
            .validate()
            .unwrap_err()
            .field_errors()
            .contains_key("quantity"));

        let negative_price = CreateProduct {
            price: dec("-0.01"),
            ..create_input()
        };
        assert!(negative_price
            .validate()
            .unwrap_err()
            .field_errors()
            .contains_key("price"));

        let free = CreateProduct {
            price: Decimal::ZERO,
            ..create_input()
        };
        assert!(free.validate().is_ok());
    }

    #[test]
    fn test_update_null_and_absent_fields_are_unset() {
        let update: UpdateProduct =
            serde_json::from_str(r#"{"price":"7.500","name":null}"#).unwrap();

        assert_eq!(update.price, Some(dec("7.500")));
        assert!(update.name.is_none());
        assert!(update.quantity.is_none());
        assert!(!update.is_empty());
        assert!(UpdateProduct::default().is_empty());
    }

    #[test]
    fn test_update_validation_checks_present_fields() {
        let update = UpdateProduct {
            quantity: Some(-5),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateProduct::default().validate().is_ok());
    }

    #[test]
    fn test_price_range_contains_is_strict() {
        let range = PriceRange::between(dec("5"), dec("10"));

        assert!(range.contains(dec("5.01")));
        assert!(range.contains(dec("9.99")));
        assert!(!range.contains(dec("5")));
        assert!(!range.contains(dec("10.000")));

        let open = PriceRange::default();
        assert!(open.contains(dec("-1")));

        let lower_only = PriceRange {
            price_min: Some(dec("5")),
            price_max: None,
        };
        assert!(lower_only.contains(dec("1000")));
        assert!(!lower_only.contains(dec("4.99")));
    }

    #[test]
    fn test_bounded_query_converts_to_range() {
        let query = BoundedPriceQuery {
            min_price: dec("1"),
            max_price: dec("2"),
        };
        assert_eq!(PriceRange::from(query), PriceRange::between(dec("1"), dec("2")));
    }
}
