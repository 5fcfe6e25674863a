//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - Spreadsheet decoding for quantity uploads
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
pub mod spreadsheet;
