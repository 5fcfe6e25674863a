//! Authentication Handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::application::dto::request::TokenRequest;
use crate::application::dto::response::TokenResponse;
use crate::application::services::AuthError;
use crate::presentation::http::extractors::AppJson;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Exchange credentials for a bearer token
pub async fn issue_token(
    State(state): State<AppState>,
    AppJson(body): AppJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let token = state
        .auth
        .issue_token(&body.username, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
            e => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(TokenResponse::from(token)))
}
