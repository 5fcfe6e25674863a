//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ProductService**: Catalog queries and product creation
//! - **UploadService**: Spreadsheet-driven quantity patches
//! - **AuthService**: Credential checks and bearer tokens

pub mod auth_service;
pub mod product_service;
pub mod upload_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthToken, Authority, Claims, Principal};
pub use product_service::{ProductError, ProductService, ProductServiceImpl};
pub use upload_service::{FileUploadDto, UploadError, UploadService, UploadServiceImpl, UploadedFile};
