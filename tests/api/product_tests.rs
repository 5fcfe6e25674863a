use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use warehouse_catalog::application::dto::{AdminProductResponse, ProductDto};
use warehouse_catalog::domain::{Brand, ProductRepository, Size};

use crate::common::{json_body, TestApp, ADMIN, READER};

#[tokio::test]
async fn find_by_name_or_brand_returns_union() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app
        .get(
            "/api/v1/products/all?name=AAA&brand=ENGLISH_LAUNDRY",
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<ProductDto> = json_body(response).await;
    let articles: Vec<i64> = products.iter().map(|p| p.article).collect();
    assert_eq!(articles, vec![120589, 120591]);
}

#[tokio::test]
async fn find_by_brand_name_alone() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app
        .get("/api/v1/products/all?brand=Dolce%26Gabbana", Some(&token))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<ProductDto> = json_body(response).await;
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.brand == Brand::Dolce));
}

#[tokio::test]
async fn find_without_criteria_is_bad_request() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app.get("/api/v1/products/all", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    assert_eq!(
        body["message"],
        "Neither name nor brand had been set as request param."
    );
}

#[tokio::test]
async fn unknown_brand_is_bad_request() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app
        .get("/api/v1/products/all?brand=CHANEL", Some(&token))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_listing_returns_full_records() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app.get("/api/v1/products/admin/all", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<AdminProductResponse> = json_body(response).await;
    assert_eq!(products.len(), 3);
    assert_eq!(products[0].article, 120589);
    assert_eq!(products[0].created_by, "seed");
    assert_eq!(products[0].version, 0);
}

#[tokio::test]
async fn last_products_defaults_to_five() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app.get("/api/v1/products/last", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<ProductDto> = json_body(response).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].article, 120591);
    assert_eq!(products[0].quantity, 3);
}

#[tokio::test]
async fn last_products_honours_last_size() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app
        .get("/api/v1/products/last?lastSize=6", Some(&token))
        .await;

    let products: Vec<ProductDto> = json_body(response).await;
    let quantities: Vec<i64> = products.iter().map(|p| p.quantity).collect();
    assert_eq!(quantities, vec![3, 6]);
}

#[tokio::test]
async fn last_size_zero_is_bad_request() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app
        .get("/api/v1/products/last?lastSize=0", Some(&token))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_products_returns_created_projections() {
    let app = TestApp::new();
    let token = app.token(ADMIN).await;

    let response = app
        .post_json(
            "/api/v1/products",
            Some(&token),
            json!([
                { "article": 1001, "name": "Light Blue", "brand": "DOLCE",
                  "price": 79.9, "quantity": 4, "size": "SIZE_50" },
                { "article": 1002, "name": "Cotton", "brand": "ENGLISH_LAUNDRY",
                  "price": 45.5, "quantity": 12, "size": "SIZE_100" }
            ]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Vec<ProductDto> = json_body(response).await;
    assert_eq!(
        created,
        vec![
            ProductDto {
                article: 1001,
                name: "Light Blue".into(),
                brand: Brand::Dolce,
                price: Decimal::new(7990, 2),
                quantity: 4,
                size: Size::Size50,
            },
            ProductDto {
                article: 1002,
                name: "Cotton".into(),
                brand: Brand::EnglishLaundry,
                price: Decimal::new(4550, 2),
                quantity: 12,
                size: Size::Size100,
            },
        ]
    );

    let stored = app.repo.get(1001, Size::Size50).await.unwrap();
    assert_eq!(stored.created_by, ADMIN.0);
    assert_eq!(stored.last_modified_by, ADMIN.0);
}

#[tokio::test]
async fn duplicate_article_and_size_is_conflict() {
    let app = TestApp::seeded().await;
    let token = app.token(ADMIN).await;

    let response = app
        .post_json(
            "/api/v1/products",
            Some(&token),
            json!([{ "article": 120589, "name": "AAA", "brand": "DOLCE",
                     "price": 9.0, "quantity": 1, "size": "SIZE_50" }]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_product_is_rejected_and_nothing_stored() {
    let app = TestApp::new();
    let token = app.token(ADMIN).await;

    let response = app
        .post_json(
            "/api/v1/products",
            Some(&token),
            json!([
                { "article": 1, "name": "Fine", "brand": "DOLCE",
                  "price": 1.0, "quantity": 1, "size": "SIZE_50" },
                { "article": 2, "name": "Negative", "brand": "DOLCE",
                  "price": 1.0, "quantity": -1, "size": "SIZE_50" }
            ]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.repo.get(1, Size::Size50).await.is_none());
}

#[tokio::test]
async fn admin_listing_of_cleared_catalog_is_empty() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    assert_eq!(app.repo.delete_all().await.unwrap(), 3);

    let response = app.get("/api/v1/products/admin/all", Some(&token)).await;
    let products: Vec<AdminProductResponse> = json_body(response).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn unknown_brand_in_body_is_bad_request_envelope() {
    let app = TestApp::new();
    let token = app.token(ADMIN).await;

    let response = app
        .post_json(
            "/api/v1/products",
            Some(&token),
            json!([{ "article": 1, "name": "No. 5", "brand": "CHANEL",
                     "price": 1.0, "quantity": 1, "size": "SIZE_50" }]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    assert_eq!(body["code"], 10007);
    assert!(body["message"].as_str().unwrap().contains("CHANEL"));
}

#[tokio::test]
async fn malformed_json_body_is_bad_request_envelope() {
    let app = TestApp::new();
    let token = app.token(ADMIN).await;

    let response = app
        .send_raw(
            Method::POST,
            "/api/v1/products",
            Some(&token),
            "application/json",
            "[{\"article\": ",
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    assert_eq!(body["code"], 10002);
}

#[tokio::test]
async fn non_numeric_last_size_is_bad_request_envelope() {
    let app = TestApp::seeded().await;
    let token = app.token(READER).await;

    let response = app
        .get("/api/v1/products/last?lastSize=abc", Some(&token))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn field_errors_are_listed_per_product() {
    let app = TestApp::new();
    let token = app.token(ADMIN).await;

    let response = app
        .post_json(
            "/api/v1/products",
            Some(&token),
            json!([{ "article": 0, "name": "", "brand": "DOLCE",
                     "price": 100000000000.0, "quantity": 1, "size": "SIZE_50" }]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["products[0].article", "products[0].name", "products[0].price"]
    );
}
