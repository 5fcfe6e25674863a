//! Authentication Middleware
//!
//! Bearer token validation and authority checks for protected routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::application::services::{AuthError, Authority, Principal};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

/// Authentication middleware that validates bearer tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    let principal = state.auth.validate_token(token).map_err(|e| match e {
        AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    request.extensions_mut().insert(AuthUser(principal));

    Ok(next.run(request).await)
}

fn require(user: &AuthUser, authority: Authority) -> Result<(), AppError> {
    if user.0.has_authority(authority) {
        Ok(())
    } else {
        tracing::debug!(user = %user.username(), %authority, "Missing authority");
        Err(AppError::Forbidden(format!("{} authority required", authority)))
    }
}

/// Reject callers without the READ authority
pub async fn require_read(
    Extension(user): Extension<AuthUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require(&user, Authority::Read)?;
    Ok(next.run(request).await)
}

/// Reject callers without the WRITE authority
pub async fn require_write(
    Extension(user): Extension<AuthUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require(&user, Authority::Write)?;
    Ok(next.run(request).await)
}
