//! Product entity and repository trait.
//!
//! Maps to the `products` table in the database schema.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Fragrance brands carried by the warehouse.
///
/// The wire and database form is the upper-case code (`DOLCE`,
/// `ENGLISH_LAUNDRY`); the display name is what appears on labels and is
/// also accepted when parsing query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Brand {
    Dolce,
    EnglishLaundry,
}

impl Brand {
    pub const ALL: [Brand; 2] = [Brand::Dolce, Brand::EnglishLaundry];

    /// Database/wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dolce => "DOLCE",
            Self::EnglishLaundry => "ENGLISH_LAUNDRY",
        }
    }

    /// Human-readable brand name.
    pub fn brand_name(&self) -> &'static str {
        match self {
            Self::Dolce => "Dolce&Gabbana",
            Self::EnglishLaundry => "English Laundry",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.brand_name())
    }
}

impl FromStr for Brand {
    type Err = AppError;

    /// Accepts either the code or the brand name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s) || b.brand_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown brand: {}", s)))
    }
}

/// Bottle sizes in millilitres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "SIZE_50")]
    Size50,
    #[serde(rename = "SIZE_100")]
    Size100,
}

impl Size {
    pub const ALL: [Size; 2] = [Size::Size50, Size::Size100];

    /// Database/wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size50 => "SIZE_50",
            Self::Size100 => "SIZE_100",
        }
    }

    pub fn millilitres(&self) -> u32 {
        match self {
            Self::Size50 => 50,
            Self::Size100 => 100,
        }
    }

    /// Map a volume in millilitres to a size, if one exists.
    pub fn from_ml(ml: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.millilitres() == ml)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = AppError;

    /// Accepts the code (`SIZE_50`) or the bare millilitre value (`50`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ml) = s.parse::<u32>() {
            return Self::from_ml(ml)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown size: {}", s)));
        }
        Self::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown size: {}", s)))
    }
}

/// A product stocked in the warehouse.
///
/// `(article, size)` is unique across the catalog.
///
/// Maps to the `products` table:
/// - id: UUID PRIMARY KEY
/// - article: BIGINT NOT NULL
/// - name: VARCHAR(255) NOT NULL
/// - brand: VARCHAR(32) NOT NULL
/// - price: NUMERIC(12, 2) NOT NULL
/// - quantity: BIGINT NOT NULL CHECK (quantity >= 0)
/// - size: VARCHAR(16) NOT NULL
/// - version: BIGINT NOT NULL DEFAULT 0
/// - created_by / last_modified_by: VARCHAR(64) NOT NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub article: i64,
    pub name: String,
    pub brand: Brand,
    pub price: Decimal,
    pub quantity: i64,
    pub size: Size,

    /// Bumped on every quantity patch
    pub version: i64,

    pub created_by: String,
    pub last_modified_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable subset of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub article: i64,
    pub name: String,
    pub brand: Brand,
    pub price: Decimal,
    pub quantity: i64,
    pub size: Size,
    pub created_by: String,
}

/// Repository trait for Product data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find products whose name equals `name` or whose brand equals `brand`.
    async fn find_by_name_or_brand(
        &self,
        name: Option<String>,
        brand: Option<Brand>,
    ) -> Result<Vec<Product>, AppError>;

    /// Find every product.
    async fn find_all(&self) -> Result<Vec<Product>, AppError>;

    /// Find products whose quantity is at most `limit`.
    async fn find_with_quantity_at_most(&self, limit: i64) -> Result<Vec<Product>, AppError>;

    /// Insert a batch of products atomically, returning them in input order.
    async fn insert_many(&self, products: &[NewProduct]) -> Result<Vec<Product>, AppError>;

    /// Add `delta` to the quantity of the product keyed by `(article, size)`.
    ///
    /// Returns `None` when no such product exists or when the result would
    /// be negative or overflow `i64`; the stored product is unchanged in
    /// every such case.
    async fn increment_quantity(
        &self,
        article: i64,
        size: Size,
        delta: i64,
        modified_by: &str,
    ) -> Result<Option<Product>, AppError>;

    /// Remove every product.
    async fn delete_all(&self) -> Result<u64, AppError>;

    /// Round-trip to the store, used by readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}
