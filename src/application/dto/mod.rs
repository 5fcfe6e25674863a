//! Data Transfer Objects
//!
//! DTOs for API request/response serialization.

pub mod product;
pub mod request;
pub mod response;

pub use product::{
    AdminProductResponse, FileUploadResponse, LastProductsParams, ProductDto, ProductQueryParams,
    DEFAULT_LAST_SIZE,
};
