//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tower::ServiceExt;
use uuid::Uuid;

use warehouse_catalog::config::{
    AuthSettings, CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings,
    UploadSettings, UserCredentials,
};
use warehouse_catalog::domain::{Brand, NewProduct, Product, ProductRepository, Size};
use warehouse_catalog::presentation::http::routes::create_router;
use warehouse_catalog::shared::error::AppError;
use warehouse_catalog::startup::AppState;

pub const ADMIN: (&str, &str) = ("admin", "admin-password");
pub const READER: (&str, &str) = ("reader", "reader-password");

const MULTIPART_BOUNDARY: &str = "catalog-test-boundary";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Argon2 is slow in debug builds; hash the test users once per binary.
static USERS: Lazy<Vec<UserCredentials>> = Lazy::new(|| {
    vec![
        user(ADMIN, &["READ", "WRITE"]),
        user(READER, &["READ"]),
    ]
});

fn user((username, password): (&str, &str), authorities: &[&str]) -> UserCredentials {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    UserCredentials {
        username: username.into(),
        password_hash,
        authorities: authorities.iter().map(|a| a.to_string()).collect(),
    }
}

/// Settings for tests; the database section is never used.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-at-least-32-chars".into(),
            access_token_expiry_minutes: 5,
        },
        auth: AuthSettings {
            users: USERS.clone(),
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        upload: UploadSettings {
            max_request_bytes: 1024 * 1024,
        },
        environment: "test".into(),
    }
}

/// In-memory product store with the same matching rules as the Postgres one.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub async fn get(&self, article: i64, size: Size) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.article == article && p.size == size)
            .cloned()
    }
}

fn sorted(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by_key(|p| (p.article, p.size.millilitres()));
    products
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_name_or_brand(
        &self,
        name: Option<String>,
        brand: Option<Brand>,
    ) -> Result<Vec<Product>, AppError> {
        let products = self.products.read().await;
        Ok(sorted(
            products
                .iter()
                .filter(|p| name.as_deref() == Some(p.name.as_str()) || brand == Some(p.brand))
                .cloned()
                .collect(),
        ))
    }

    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        Ok(sorted(self.products.read().await.clone()))
    }

    async fn find_with_quantity_at_most(&self, limit: i64) -> Result<Vec<Product>, AppError> {
        let mut found: Vec<Product> = self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.quantity <= limit)
            .cloned()
            .collect();
        found.sort_by_key(|p| (p.quantity, p.article));
        Ok(found)
    }

    async fn insert_many(&self, products: &[NewProduct]) -> Result<Vec<Product>, AppError> {
        let mut stored = self.products.write().await;
        let now = Utc::now();

        let mut created: Vec<Product> = Vec::with_capacity(products.len());
        for new in products {
            let taken = stored
                .iter()
                .chain(created.iter())
                .any(|p| p.article == new.article && p.size == new.size);
            if taken {
                return Err(AppError::Conflict(format!(
                    "Product with article {} and size {} already exists",
                    new.article, new.size
                )));
            }

            created.push(Product {
                id: Uuid::now_v7(),
                article: new.article,
                name: new.name.clone(),
                brand: new.brand,
                price: new.price,
                quantity: new.quantity,
                size: new.size,
                version: 0,
                created_by: new.created_by.clone(),
                last_modified_by: new.created_by.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        stored.extend(created.iter().cloned());
        Ok(created)
    }

    async fn increment_quantity(
        &self,
        article: i64,
        size: Size,
        delta: i64,
        modified_by: &str,
    ) -> Result<Option<Product>, AppError> {
        let mut stored = self.products.write().await;
        let Some(product) = stored
            .iter_mut()
            .find(|p| p.article == article && p.size == size)
        else {
            return Ok(None);
        };

        let Some(quantity) = product.quantity.checked_add(delta).filter(|q| *q >= 0) else {
            return Ok(None);
        };

        product.quantity = quantity;
        product.version += 1;
        product.last_modified_by = modified_by.to_string();
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut stored = self.products.write().await;
        let removed = stored.len() as u64;
        stored.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// The three products every API test starts from.
pub fn seed_products() -> Vec<NewProduct> {
    let product = |article, name: &str, brand, quantity, size| NewProduct {
        article,
        name: name.into(),
        brand,
        price: Decimal::new(900, 2),
        quantity,
        size,
        created_by: "seed".into(),
    };

    vec![
        product(120589, "AAA", Brand::Dolce, 9, Size::Size50),
        product(120590, "BBB", Brand::Dolce, 6, Size::Size100),
        product(120591, "CCC", Brand::EnglishLaundry, 3, Size::Size100),
    ]
}

/// Read a spreadsheet from `tests/fixtures`.
pub fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("missing fixture {}: {}", path, e))
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryProductRepository>,
}

impl TestApp {
    /// Router over an empty in-memory store
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryProductRepository::default());
        let state = AppState::new(test_settings(), repo.clone());

        Self {
            router: create_router(state),
            repo,
        }
    }

    /// Router over the seeded products
    pub async fn seeded() -> Self {
        let app = Self::new();
        app.repo.insert_many(&seed_products()).await.unwrap();
        app
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Obtain a bearer token for one of the configured users
    pub async fn token(&self, (username, password): (&str, &str)) -> String {
        let response = self
            .post_json(
                "/api/v1/auth/token",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = json_body(response).await;
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Make a GET request, authenticated when a token is given
    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let request = with_token(Request::builder().method(Method::GET).uri(uri), token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with a JSON body
    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        let request = with_token(Request::builder().method(Method::POST).uri(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a request with an arbitrary content type and body
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        content_type: &str,
        body: impl Into<Body>,
    ) -> Response {
        let request = with_token(Request::builder().method(method).uri(uri), token)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    /// Make a multipart PATCH request with one `file` part per entry
    pub async fn patch_files(
        &self,
        uri: &str,
        token: Option<&str>,
        files: &[(&str, Vec<u8>)],
    ) -> Response {
        let request = with_token(Request::builder().method(Method::PATCH).uri(uri), token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(multipart_body("file", files)))
            .unwrap();
        self.send(request).await
    }
}

fn with_token(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn multipart_body(field: &str, files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {XLSX_CONTENT_TYPE}\r\n\r\n",
                b = MULTIPART_BOUNDARY,
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

/// Collect and deserialize a JSON response body
pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
