//! Product Service
//!
//! Catalog queries and product creation.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::application::dto::ProductDto;
use crate::domain::{Brand, NewProduct, Product, ProductRepository};
use crate::shared::error::{AppError, FieldError};
use crate::shared::validation::validation_error;

/// Product service trait
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Products matching the name or the brand
    async fn find_products_by_name_or_brand(
        &self,
        name: Option<String>,
        brand: Option<Brand>,
    ) -> Result<Vec<ProductDto>, ProductError>;

    /// Every product, full record
    async fn find_all(&self) -> Result<Vec<Product>, ProductError>;

    /// Products whose quantity is at most `last_size`
    async fn find_last_products(&self, last_size: i64) -> Result<Vec<ProductDto>, ProductError>;

    /// Create a batch of products on behalf of `user_name`
    async fn create_products(
        &self,
        products: Vec<ProductDto>,
        user_name: &str,
    ) -> Result<Vec<ProductDto>, ProductError>;
}

/// Product service errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Neither name nor brand had been set as request param.")]
    MissingCriteria,

    #[error("lastSize must be at least 1")]
    InvalidLastSize,

    #[error("No products supplied")]
    EmptyBatch,

    #[error("Invalid product at index {index}: {source}")]
    InvalidProduct {
        index: usize,
        #[source]
        source: AppError,
    },

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::MissingCriteria
            | ProductError::InvalidLastSize
            | ProductError::EmptyBatch => AppError::Validation(err.to_string()),
            ProductError::InvalidProduct {
                index,
                source: AppError::InvalidFields(errors),
            } => AppError::InvalidFields(
                errors
                    .into_iter()
                    .map(|e| FieldError {
                        field: format!("products[{}].{}", index, e.field),
                        message: e.message,
                    })
                    .collect(),
            ),
            ProductError::InvalidProduct { index, source } => {
                AppError::Validation(format!("products[{}]: {}", index, source))
            }
            ProductError::Repository(e) => e,
        }
    }
}

/// ProductService implementation
pub struct ProductServiceImpl<R>
where
    R: ProductRepository + ?Sized,
{
    product_repo: Arc<R>,
}

impl<R> ProductServiceImpl<R>
where
    R: ProductRepository + ?Sized,
{
    pub fn new(product_repo: Arc<R>) -> Self {
        Self { product_repo }
    }
}

#[async_trait]
impl<R> ProductService for ProductServiceImpl<R>
where
    R: ProductRepository + ?Sized + 'static,
{
    async fn find_products_by_name_or_brand(
        &self,
        name: Option<String>,
        brand: Option<Brand>,
    ) -> Result<Vec<ProductDto>, ProductError> {
        let name = name.filter(|n| !n.trim().is_empty());
        if name.is_none() && brand.is_none() {
            return Err(ProductError::MissingCriteria);
        }

        tracing::debug!(?name, ?brand, "Finding products by name or brand");

        let products = self.product_repo.find_by_name_or_brand(name, brand).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn find_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.product_repo.find_all().await?)
    }

    async fn find_last_products(&self, last_size: i64) -> Result<Vec<ProductDto>, ProductError> {
        if last_size < 1 {
            return Err(ProductError::InvalidLastSize);
        }

        let products = self.product_repo.find_with_quantity_at_most(last_size).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn create_products(
        &self,
        products: Vec<ProductDto>,
        user_name: &str,
    ) -> Result<Vec<ProductDto>, ProductError> {
        if products.is_empty() {
            return Err(ProductError::EmptyBatch);
        }

        let new_products = products
            .into_iter()
            .enumerate()
            .map(|(index, dto)| {
                dto.validate().map_err(|e| ProductError::InvalidProduct {
                    index,
                    source: validation_error(e),
                })?;

                Ok(NewProduct {
                    article: dto.article,
                    name: dto.name,
                    brand: dto.brand,
                    price: dto.price,
                    quantity: dto.quantity,
                    size: dto.size,
                    created_by: user_name.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ProductError>>()?;

        let created = self.product_repo.insert_many(&new_products).await?;
        tracing::info!(count = created.len(), user = %user_name, "Products created");

        Ok(created.into_iter().map(ProductDto::from).collect())
    }
}
