//! Product DTOs
//!
//! Wire representations for the product catalog endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::FileUploadDto;
use crate::domain::{Brand, Product, Size};
use crate::shared::validation::validate_price;

/// Public projection of a product, used for both requests and responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[validate(range(min = 1, message = "Article must be a positive number"))]
    pub article: i64,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub brand: Brand,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i64,

    pub size: Size,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            article: product.article,
            name: product.name,
            brand: product.brand,
            price: product.price,
            quantity: product.quantity,
            size: product.size,
        }
    }
}

/// Full product record for administrative listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductResponse {
    pub id: Uuid,
    pub article: i64,
    pub name: String,
    pub brand: Brand,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i64,
    pub size: Size,
    pub version: i64,
    pub created_by: String,
    pub last_modified_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for AdminProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            article: product.article,
            name: product.name,
            brand: product.brand,
            price: product.price,
            quantity: product.quantity,
            size: product.size,
            version: product.version,
            created_by: product.created_by,
            last_modified_by: product.last_modified_by,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Query parameters for `GET /all`.
///
/// The brand is kept as text so it can be matched by code or brand name.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQueryParams {
    pub name: Option<String>,
    pub brand: Option<String>,
}

/// Default low-stock threshold for `GET /last`.
pub const DEFAULT_LAST_SIZE: i64 = 5;

/// Query parameters for `GET /last`.
#[derive(Debug, Deserialize, Validate)]
pub struct LastProductsParams {
    #[serde(rename = "lastSize", default = "default_last_size")]
    #[validate(range(min = 1, message = "lastSize must be at least 1"))]
    pub last_size: i64,
}

fn default_last_size() -> i64 {
    DEFAULT_LAST_SIZE
}

/// Outcome of one uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    pub file_name: String,
    pub rows_read: u64,
    pub rows_updated: u64,
    pub rows_skipped: u64,
    pub uploaded_by: String,
}

impl From<FileUploadDto> for FileUploadResponse {
    fn from(dto: FileUploadDto) -> Self {
        Self {
            file_name: dto.file_name,
            rows_read: dto.rows_read,
            rows_updated: dto.rows_updated,
            rows_skipped: dto.rows_skipped,
            uploaded_by: dto.uploaded_by,
        }
    }
}
