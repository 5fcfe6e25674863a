//! # Domain Layer
//!
//! The domain layer contains the core business types of the catalog.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Product, its brand and size enums, and the repository trait
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts

pub mod entities;

// Re-export commonly used types
pub use entities::*;
