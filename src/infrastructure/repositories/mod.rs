//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::PgProductRepository;
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let product_repo = PgProductRepository::new(pool.clone());
//! }
//! ```

pub mod product_repository;

pub use product_repository::PgProductRepository;
