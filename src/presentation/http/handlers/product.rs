//! Product Handlers

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::{
    AdminProductResponse, FileUploadResponse, LastProductsParams, ProductDto, ProductQueryParams,
};
use crate::application::services::{
    ProductService, ProductServiceImpl, UploadService, UploadServiceImpl, UploadedFile,
};
use crate::domain::Brand;
use crate::presentation::http::extractors::{AppJson, AppQuery};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Multipart field carrying spreadsheets
const FILE_FIELD: &str = "file";

/// Find products by name or brand
pub async fn find_products_by_name_or_brand(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ProductQueryParams>,
) -> Result<Json<Vec<ProductDto>>, AppError> {
    tracing::debug!(name = ?params.name, brand = ?params.brand, "findProductsByNameOrBrand");

    let brand = params
        .brand
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .map(str::parse::<Brand>)
        .transpose()?;

    let service = ProductServiceImpl::new(state.products.clone());
    let products = service
        .find_products_by_name_or_brand(params.name, brand)
        .await?;

    Ok(Json(products))
}

/// Full product records for administrative needs
pub async fn find_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminProductResponse>>, AppError> {
    let service = ProductServiceImpl::new(state.products.clone());
    let products = service.find_all().await?;

    Ok(Json(products.into_iter().map(AdminProductResponse::from).collect()))
}

/// Products whose quantity is at most `lastSize` (default 5)
pub async fn find_last_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<LastProductsParams>,
) -> Result<Json<Vec<ProductDto>>, AppError> {
    params.validate().map_err(validation_error)?;

    let service = ProductServiceImpl::new(state.products.clone());
    let products = service.find_last_products(params.last_size).await?;

    Ok(Json(products))
}

/// Create a batch of products
pub async fn create_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<Vec<ProductDto>>,
) -> Result<(StatusCode, Json<Vec<ProductDto>>), AppError> {
    let service = ProductServiceImpl::new(state.products.clone());
    let created = service.create_products(body, user.username()).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Add spreadsheet quantities to existing products, matched by article and size
pub async fn patch_product_quantity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<FileUploadResponse>>), AppError> {
    let mut multipart = multipart?;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload-{}", files.len() + 1));
        let bytes = field.bytes().await.map_err(multipart_error)?;

        files.push(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    let service = UploadServiceImpl::new(state.products.clone());
    let summaries = service
        .patch_product_quantity(files, user.username())
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(summaries.into_iter().map(FileUploadResponse::from).collect()),
    ))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
