//! # Warehouse Catalog Library
//!
//! This crate provides the backend of a warehouse product catalog with:
//! - RESTful HTTP API for querying and creating products
//! - Spreadsheet uploads that add quantity deltas to existing products
//! - PostgreSQL for persistent storage
//! - Bearer token authentication with READ/WRITE authorities
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Product entity and repository trait
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, spreadsheet decoding, and metrics
//! - **Presentation Layer**: HTTP handlers, routes, and middleware
//!
//! ## Module Structure
//!
//! ```text
//! warehouse_catalog/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database, spreadsheet, and metrics implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
