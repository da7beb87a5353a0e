//! MongoDB integration tests for the products repository and service.
//!
//! Each test starts its own MongoDB container and is ignored by default.
//! Run with `cargo test -p domain_products -- --ignored`.

use domain_products::{
    CreateProduct, MongoProductRepository, PriceRange, ProductError, ProductRepository,
    ProductService, UpdateProduct,
};
use mongodb::bson::{doc, Bson, Document};
use rust_decimal::Decimal;
use test_utils::{TestDataBuilder, TestMongo};
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn input(name: &str, price: &str) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        quantity: 10,
        price: dec(price),
        status: true,
    }
}

async fn setup(mongo: &TestMongo) -> ProductService<MongoProductRepository> {
    let repository = MongoProductRepository::new(&mongo.database());
    repository.init_indexes().await.unwrap();
    ProductService::new(repository)
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_get_round_trip() {
    let mongo = TestMongo::new().await;
    let service = setup(&mongo).await;

    let created = service
        .create_product(input("Iphone 14 pro Max", "8.500"))
        .await
        .unwrap();
    let fetched = service.get_product(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.price.to_string(), "8.500");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_price_is_stored_as_decimal128_under_id_key() {
    let mongo = TestMongo::new().await;
    let service = setup(&mongo).await;

    let created = service.create_product(input("raw", "19.99")).await.unwrap();

    let raw = mongo
        .database()
        .collection::<Document>("products")
        .find_one(doc! { "id": created.id.to_string() })
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(raw.get("price"), Some(Bson::Decimal128(_))));
    assert!(matches!(raw.get("created_at"), Some(Bson::DateTime(_))));
    assert!(matches!(raw.get("_id"), Some(Bson::ObjectId(_))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_partial_update_is_atomic_and_selective() {
    let mongo = TestMongo::new().await;
    let service = setup(&mongo).await;

    let created = service
        .create_product(input("Iphone 14 pro Max", "8.500"))
        .await
        .unwrap();

    let updated = service
        .update_product(
            created.id,
            UpdateProduct {
                price: Some(dec("7.500")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.price.to_string(), "7.500");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.quantity, created.quantity);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    assert_eq!(service.get_product(created.id).await.unwrap(), updated);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_missing_product_is_not_found() {
    let mongo = TestMongo::new().await;
    let service = setup(&mongo).await;

    let err = service
        .update_product(Uuid::new_v4(), UpdateProduct::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProductError::NotFound(_)));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_delete_then_get_is_not_found() {
    let mongo = TestMongo::new().await;
    let service = setup(&mongo).await;

    let created = service.create_product(input("gone", "1.00")).await.unwrap();

    assert!(service.delete_product(created.id).await.unwrap());
    assert!(matches!(
        service.get_product(created.id).await,
        Err(ProductError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_product(created.id).await,
        Err(ProductError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_price_range_uses_decimal_comparison() {
    let mongo = TestMongo::new().await;
    let service = setup(&mongo).await;

    for (name, price) in [("a", "5.00"), ("b", "5.01"), ("c", "9.999"), ("d", "10")] {
        service.create_product(input(name, price)).await.unwrap();
    }

    let mut names: Vec<_> = service
        .query_products_between(dec("5"), dec("10.000"))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();
    assert_eq!(names, ["b", "c"]);

    let above = service
        .query_products(PriceRange {
            price_min: Some(dec("9.999")),
            price_max: None,
        })
        .await
        .unwrap();
    assert_eq!(above.len(), 1);
    assert_eq!(above[0].name, "d");

    let all = service.query_products(PriceRange::default()).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_duplicate_id_is_insertion_error() {
    let mongo = TestMongo::new().await;
    let repository = MongoProductRepository::new(&mongo.database());
    repository.init_indexes().await.unwrap();

    let builder = TestDataBuilder::from_test_name("duplicate_id");
    let mut product = domain_products::Product::new(input(&builder.name("product", "dup"), "1.00"));
    product.id = builder.id();

    repository.insert(product.clone()).await.unwrap();
    let err = repository.insert(product).await.unwrap_err();

    assert!(matches!(err, ProductError::Insertion(_)));
    assert!(err.to_string().starts_with("Failed to insert product:"));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_store_update_keeps_updated_at_after_created_at() {
    let mongo = TestMongo::new().await;
    let repository = MongoProductRepository::new(&mongo.database());
    repository.init_indexes().await.unwrap();

    let mut product = domain_products::Product::new(input("clock skew", "3.00"));
    let ahead = product.created_at + chrono::Duration::hours(1);
    product.created_at = ahead;
    product.updated_at = ahead;
    repository.insert(product.clone()).await.unwrap();

    let updated = repository
        .update(
            product.id,
            UpdateProduct {
                quantity: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.quantity, 4);
    assert_eq!(updated.created_at, ahead);
    assert_eq!(updated.updated_at, ahead);
}
