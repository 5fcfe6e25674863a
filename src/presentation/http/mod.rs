//! HTTP Layer
//!
//! Routes, extractors and request handlers for the REST API.

pub mod extractors;
pub mod handlers;
pub mod routes;
