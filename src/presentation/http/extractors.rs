//! Custom Extractors
//!
//! `Json` and `Query` wrappers whose rejections render as `AppError`, so
//! malformed bodies and query strings get the same `{code, message}` body
//! as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::shared::error::AppError;

/// JSON body extractor rejecting with `AppError`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor rejecting with `AppError`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
