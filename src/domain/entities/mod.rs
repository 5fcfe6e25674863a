//! # Domain Entities
//!
//! Core domain entities of the warehouse catalog.
//!
//! - **Product**: a stocked article in a given bottle size
//! - **Brand** / **Size**: closed sets of brands and bottle sizes
//!
//! ## Repository Traits
//!
//! `ProductRepository` defines data access for products and is implemented
//! in the infrastructure layer.

mod product;

pub use product::{Brand, NewProduct, Product, ProductRepository, Size};

#[cfg(test)]
pub use product::MockProductRepository;
